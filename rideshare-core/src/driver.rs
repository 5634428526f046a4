//! Drivers publish rides and are identified by their email address.

use thiserror::Error;

/// A registered driver.
///
/// # Examples
///
/// ```
/// use rideshare_core::Driver;
///
/// # fn main() -> Result<(), rideshare_core::DriverError> {
/// let driver = Driver::new("driver1@gmail.com", "Aitor Fernandez")?;
/// assert_eq!(driver.email, "driver1@gmail.com");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Driver {
    /// Unique email address; the driver's identity.
    pub email: String,
    /// Name shown to passengers.
    pub name: String,
}

/// Errors returned by [`Driver::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    /// The email was empty or only whitespace.
    #[error("driver email must not be blank")]
    BlankEmail,
    /// The display name was empty or only whitespace.
    #[error("driver name must not be blank")]
    BlankName,
}

impl Driver {
    /// Validates and constructs a [`Driver`]. Surrounding whitespace is
    /// trimmed from both fields.
    pub fn new(email: impl AsRef<str>, name: impl AsRef<str>) -> Result<Self, DriverError> {
        let email = email.as_ref().trim();
        let name = name.as_ref().trim();
        if email.is_empty() {
            return Err(DriverError::BlankEmail);
        }
        if name.is_empty() {
            return Err(DriverError::BlankName);
        }
        Ok(Self {
            email: email.to_owned(),
            name: name.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "Ane", DriverError::BlankEmail)]
    #[case("  ", "Ane", DriverError::BlankEmail)]
    #[case("ane@example.com", "", DriverError::BlankName)]
    fn rejects_blank_fields(
        #[case] email: &str,
        #[case] name: &str,
        #[case] expected: DriverError,
    ) {
        assert_eq!(Driver::new(email, name), Err(expected));
    }

    #[rstest]
    fn trims_fields() {
        let driver = Driver::new(" ane@example.com ", " Ane Gaztañaga ").expect("valid driver");
        assert_eq!(driver.email, "ane@example.com");
        assert_eq!(driver.name, "Ane Gaztañaga");
    }
}
