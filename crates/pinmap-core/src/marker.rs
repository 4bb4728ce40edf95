//! Marker domain types: coordinates, identifiers and the state-tagged
//! popup label.

/// Popup label shown while a marker's address lookup is outstanding.
pub const RESOLVING_LABEL: &str = "Resolving address…";

/// Popup label shown when a marker's address lookup settled with an error.
pub const FAILED_LABEL: &str = "Address lookup failed";

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Fixed 4-decimal display form used in marker popups.
    pub fn display_fixed(&self) -> String {
        format!("{:.4},{:.4}", self.lat, self.lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_fixed())
    }
}

/// Opaque marker identifier, unique for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

impl MarkerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

/// Address resolution state of a marker's popup label.
///
/// A marker transitions at most once, from `Pending` to one of the terminal
/// states. Terminal states never change again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressState {
    /// The reverse-geocode request is still outstanding.
    Pending,
    /// The lookup settled with a human-readable address.
    Resolved(String),
    /// The lookup settled with an error; causes are not distinguished.
    Failed,
}

impl AddressState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A dropped pin: an immutable position plus the mutable popup label state.
///
/// Markers are created and mutated only by the [`MarkerController`]; every
/// other component sees read-only snapshots.
///
/// [`MarkerController`]: crate::controller::MarkerController
#[derive(Debug, Clone)]
pub struct Marker {
    id: MarkerId,
    position: Coordinate,
    address: AddressState,
    popup_opened: bool,
}

impl Marker {
    pub(crate) fn pending(id: MarkerId, position: Coordinate) -> Self {
        Self {
            id,
            position,
            address: AddressState::Pending,
            popup_opened: false,
        }
    }

    pub(crate) fn resolved(id: MarkerId, position: Coordinate, label: impl Into<String>) -> Self {
        Self {
            id,
            position,
            address: AddressState::Resolved(label.into()),
            popup_opened: false,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn address(&self) -> &AddressState {
        &self.address
    }

    /// Whether the introductory popup-open action has already fired.
    /// One-way; set after the first mount, never cleared.
    pub fn popup_opened(&self) -> bool {
        self.popup_opened
    }

    /// Display text for the popup label.
    pub fn label(&self) -> &str {
        match &self.address {
            AddressState::Pending => RESOLVING_LABEL,
            AddressState::Resolved(address) => address,
            AddressState::Failed => FAILED_LABEL,
        }
    }

    pub(crate) fn set_address(&mut self, address: AddressState) {
        self.address = address;
    }

    pub(crate) fn set_popup_opened(&mut self) {
        self.popup_opened = true;
    }
}
