//! Async auto-suggest driver.

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use intake_map::{ProviderError, SuggestionProvider};

use crate::session::{SuggestOutcome, WizardSession};

/// Run one auto-suggest against `provider`.
///
/// Returns [`SuggestOutcome::NotStarted`] when the session has no file or a
/// suggestion is already running. Cancelling `cancel` abandons the request
/// and leaves mappings unchanged.
pub async fn auto_suggest<P: SuggestionProvider + ?Sized>(
    session: &mut WizardSession,
    provider: &P,
    cancel: &CancellationToken,
) -> SuggestOutcome {
    let Some(request) = session.suggestion_request() else {
        return SuggestOutcome::NotStarted;
    };
    let Some(ticket) = session.begin_auto_suggest() else {
        return SuggestOutcome::NotStarted;
    };
    let span = info_span!("auto_suggest", columns = request.columns.len());

    let result = async {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = provider.suggest(&request) => result,
        }
    }
    .instrument(span)
    .await;

    if matches!(result, Err(ProviderError::Cancelled)) {
        session.cancel_auto_suggest();
        return SuggestOutcome::Cancelled;
    }
    session.finish_auto_suggest(ticket, result)
}
