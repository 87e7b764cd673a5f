//! Caller-side pacing of a splash

use std::future::Future;

use async_trait::async_trait;

use crate::ripple::{RippleResponse, RippleResult};

/// Receives each published layer of a splash
///
/// The splash does no work while `on_ripple` is pending, so the handler
/// decides when the next wave runs. A handler that never resolves holds the
/// splash where it is.
#[async_trait]
pub trait RippleHandler: Send {
    async fn on_ripple(&mut self, result: RippleResult) -> RippleResponse;
}

/// Any closure returning an owned future is a handler
#[async_trait]
impl<F, Fut> RippleHandler for F
where
    F: FnMut(RippleResult) -> Fut + Send,
    Fut: Future<Output = RippleResponse> + Send + 'static,
{
    async fn on_ripple(&mut self, result: RippleResult) -> RippleResponse {
        (self)(result).await
    }
}
