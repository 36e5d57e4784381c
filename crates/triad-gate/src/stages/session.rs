use async_trait::async_trait;

use crate::error::AccessError;
use crate::request::RequestContext;
use crate::stage::{Flow, Stage};

/// Requires an authenticated session.
///
/// Placed after every read handler, so only requests that no read handler
/// answered ever reach it: the mutations, and anything with no route.
pub struct SessionStage;

#[async_trait]
impl Stage for SessionStage {
    fn name(&self) -> &str {
        "session"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        if ctx.session.is_authenticated() {
            Ok(Flow::Continue)
        } else {
            Err(AccessError::login_required())
        }
    }
}
