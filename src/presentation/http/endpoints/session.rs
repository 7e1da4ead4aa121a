use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use crate::presentation::http::endpoints::root::{ApiState, EndpointsTags};
use crate::presentation::http::responses::SessionStatusDto;

pub struct SessionEndpoints {
    state: Arc<ApiState>,
}

impl SessionEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl SessionEndpoints {
    /// Readiness of the bridge session. Pairing itself happens on the bridge
    /// side; this only reports whether sends can currently go out.
    #[oai(path = "/session", method = "get", tag = EndpointsTags::Session)]
    pub async fn session_status(&self) -> Json<SessionStatusDto> {
        let state = self.state.transport.session_state();
        Json(SessionStatusDto {
            ready: state.is_ready(),
            state: state.into(),
        })
    }
}
