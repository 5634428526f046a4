//! Presentation shell: three screens sharing one reusable window.
//!
//! The shell owns no ride data. Screens receive the facade when they are
//! built and render plain text from what it returns.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::ValueEnum;
use log::debug;
use rideshare_core::{MessageKey, NewRide, Ride, RideFacade, RideStoreError};

/// Which screen the window is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenKind {
    /// Entry menu.
    MainMenu,
    /// Browse rides by route and date.
    QueryRides,
    /// Publish a new ride.
    CreateRide,
}

impl ScreenKind {
    /// Window title shown with the screen.
    #[must_use]
    pub const fn title(self) -> MessageKey {
        match self {
            Self::MainMenu => MessageKey::MainTitle,
            Self::QueryRides => MessageKey::QueryRides,
            Self::CreateRide => MessageKey::CreateRide,
        }
    }

    /// Window size (width, height) used for the screen.
    #[must_use]
    pub const fn size(self) -> (u32, u32) {
        match self {
            Self::MainMenu => (320, 250),
            Self::QueryRides => (1000, 500),
            Self::CreateRide => (550, 400),
        }
    }
}

/// The single top-level window whose content is swapped between screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    title: MessageKey,
    width: u32,
    height: u32,
    content: ScreenKind,
}

impl Window {
    fn showing(content: ScreenKind) -> Self {
        let (width, height) = content.size();
        Self {
            title: content.title(),
            width,
            height,
            content,
        }
    }

    fn place(&mut self, content: ScreenKind) {
        let (width, height) = content.size();
        self.title = content.title();
        self.width = width;
        self.height = height;
        self.content = content;
    }

    /// Title key of the window.
    #[must_use]
    pub const fn title(&self) -> MessageKey {
        self.title
    }

    /// Current (width, height).
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Screen currently placed in the window.
    #[must_use]
    pub const fn content(&self) -> ScreenKind {
        self.content
    }
}

/// Entry screen offering the other two.
pub struct MainMenu {
    facade: Arc<dyn RideFacade>,
}

impl MainMenu {
    /// Build the menu around `facade`.
    #[must_use]
    pub fn new(facade: Arc<dyn RideFacade>) -> Self {
        Self { facade }
    }

    fn render(&self, out: &mut String) -> Result<(), RideStoreError> {
        let departures = self.facade.departure_cities()?.len();
        out.push_str(&format!("1. {}\n", MessageKey::QueryRides.default_text()));
        out.push_str(&format!("2. {}\n", MessageKey::CreateRide.default_text()));
        out.push_str(&format!("Rides depart from {departures} cities.\n"));
        Ok(())
    }
}

/// Screen listing the rides on one route and day.
pub struct QueryRidesScreen {
    facade: Arc<dyn RideFacade>,
    today: NaiveDate,
}

impl QueryRidesScreen {
    /// Build the screen around `facade`, browsing from the month of `today`.
    #[must_use]
    pub fn new(facade: Arc<dyn RideFacade>, today: NaiveDate) -> Self {
        Self { facade, today }
    }

    /// Rides on the selected route and day.
    pub fn rides(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ride>, RideStoreError> {
        self.facade.rides(origin, destination, date)
    }

    fn render(&self, out: &mut String) -> Result<(), RideStoreError> {
        let events = self.facade.event_dates_in_month(self.today)?;
        out.push_str(&format!("Days with rides this month: {}\n", join(&events)));
        for origin in self.facade.departure_cities()? {
            for destination in self.facade.arrival_cities(&origin)? {
                let dates = self
                    .facade
                    .ride_dates_in_month(&origin, &destination, self.today)?;
                out.push_str(&format!("{origin} -> {destination}: {}\n", join(&dates)));
            }
        }
        Ok(())
    }
}

/// Form screen for publishing a ride.
pub struct CreateRideScreen {
    facade: Arc<dyn RideFacade>,
}

impl CreateRideScreen {
    /// Build the screen around `facade`.
    #[must_use]
    pub fn new(facade: Arc<dyn RideFacade>) -> Self {
        Self { facade }
    }

    /// Submit the form, mapping rejections to the message shown to the user.
    pub fn submit(&self, ride: &NewRide, driver_email: &str) -> Result<Ride, MessageKey> {
        self.facade
            .create_ride(ride, driver_email)
            .map_err(|err| err.message_key())
    }

    fn render(&self, out: &mut String) -> Result<(), RideStoreError> {
        let known = self.facade.departure_cities()?;
        for field in ["Driver email", "From", "To", "Date", "Seats", "Price"] {
            out.push_str(&format!("{field}: \n"));
        }
        out.push_str(&format!("Known departure cities: {}\n", known.join(", ")));
        Ok(())
    }
}

fn join(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Holds the three screens and decides which one the window shows.
pub struct Shell {
    window: Window,
    main_menu: MainMenu,
    query_rides: QueryRidesScreen,
    create_ride: CreateRideScreen,
}

impl Shell {
    /// Build every screen once around `facade` and show the main menu.
    #[must_use]
    pub fn new(facade: &Arc<dyn RideFacade>, today: NaiveDate) -> Self {
        Self {
            window: Window::showing(ScreenKind::MainMenu),
            main_menu: MainMenu::new(Arc::clone(facade)),
            query_rides: QueryRidesScreen::new(Arc::clone(facade), today),
            create_ride: CreateRideScreen::new(Arc::clone(facade)),
        }
    }

    /// Show the main menu.
    pub fn show_main_menu(&mut self) {
        self.show(ScreenKind::MainMenu);
    }

    /// Show the ride query screen.
    pub fn show_ride_query_screen(&mut self) {
        self.show(ScreenKind::QueryRides);
    }

    /// Show the create-ride screen.
    pub fn show_create_ride_screen(&mut self) {
        self.show(ScreenKind::CreateRide);
    }

    /// Show `kind`, replacing whatever the window held.
    pub fn show(&mut self, kind: ScreenKind) {
        debug!("showing {kind:?} screen");
        self.window.place(kind);
    }

    /// The reusable window.
    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// The ride query screen.
    #[must_use]
    pub const fn query_rides(&self) -> &QueryRidesScreen {
        &self.query_rides
    }

    /// The create-ride screen.
    #[must_use]
    pub const fn create_ride(&self) -> &CreateRideScreen {
        &self.create_ride
    }

    /// Render the visible screen under its window title.
    pub fn render(&self) -> Result<String, RideStoreError> {
        let (width, height) = self.window.size();
        let mut out = format!(
            "== {} ({width}x{height}) ==\n",
            self.window.title().default_text()
        );
        match self.window.content() {
            ScreenKind::MainMenu => self.main_menu.render(&mut out)?,
            ScreenKind::QueryRides => self.query_rides.render(&mut out)?,
            ScreenKind::CreateRide => self.create_ride.render(&mut out)?,
        }
        Ok(out)
    }
}
