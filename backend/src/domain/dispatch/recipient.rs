//! Recipient selection for a dispatch call.

use uuid::Uuid;

/// Which participants of an event a call addresses.
///
/// `Only` with an empty list addresses nobody. Adapters that treat an empty
/// request list as "everyone" convert through
/// [`RecipientSelection::from_requested`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelection {
    All,
    Only(Vec<Uuid>),
}

impl RecipientSelection {
    /// Map an optional, possibly empty, request list: absent or empty means
    /// every participant.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::dispatch::RecipientSelection;
    /// use uuid::Uuid;
    ///
    /// assert_eq!(RecipientSelection::from_requested(None), RecipientSelection::All);
    /// assert_eq!(RecipientSelection::from_requested(Some(vec![])), RecipientSelection::All);
    /// let id = Uuid::new_v4();
    /// assert_eq!(
    ///     RecipientSelection::from_requested(Some(vec![id])),
    ///     RecipientSelection::Only(vec![id])
    /// );
    /// ```
    pub fn from_requested(ids: Option<Vec<Uuid>>) -> Self {
        match ids {
            Some(ids) if !ids.is_empty() => Self::Only(ids),
            _ => Self::All,
        }
    }

    /// Whether `participant_id` is addressed.
    pub fn includes(&self, participant_id: &Uuid) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(participant_id),
        }
    }
}
