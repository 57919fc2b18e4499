// Application state for HTTP handlers
use crate::application::conditions_service::ConditionsService;

#[derive(Clone)]
pub struct AppState {
    pub conditions_service: ConditionsService,
}
