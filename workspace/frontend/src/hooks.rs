/// API fetch state enum
#[derive(Clone, PartialEq, Debug)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Loading
    }
}
