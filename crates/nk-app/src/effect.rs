use nk_core::Route;

/// Something a view asks the UI binding to do after handling an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a blocking message.
    Alert(String),
    Navigate(Route),
}

impl Effect {
    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert(message.into())
    }
}
