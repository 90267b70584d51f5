#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl FetchStatus {
    /// Lists are only rendered once their fetch succeeded.
    pub fn is_ready(self) -> bool {
        self == Self::Succeeded
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
