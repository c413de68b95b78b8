use crate::services::analysis_state::SharedAnalysisState;

#[derive(Clone)]
pub struct AppState {
    pub analysis_state: SharedAnalysisState,
}
