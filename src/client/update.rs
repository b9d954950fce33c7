use tracing::debug;

use super::{ClientState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ClientState, msg: Msg) -> (ClientState, Vec<Effect>) {
    if !matches!(msg, Msg::Restore(_)) {
        state.clear_restored();
    }

    let effects = match msg {
        Msg::IndustryChanged(value) => {
            if state.set_industry(value) {
                vec![Effect::Persist(state.snapshot())]
            } else {
                Vec::new()
            }
        }
        Msg::DescriptionChanged(value) => {
            if state.set_description(value) {
                vec![Effect::Persist(state.snapshot())]
            } else {
                Vec::new()
            }
        }
        Msg::Submit(mode) => {
            if !state.can_submit() {
                debug!(%mode, in_flight = ?state.in_flight(), "Submit ignored");
                return (state, Vec::new());
            }
            let request_id = state.begin_request(mode);
            let snapshot = state.snapshot();
            vec![
                Effect::CancelTyping,
                Effect::SendRequest {
                    request_id,
                    mode,
                    industry: snapshot.industry.clone(),
                    description: snapshot.description.clone(),
                },
                Effect::Persist(snapshot),
            ]
        }
        Msg::ResponseArrived { request_id, data } => {
            if !state.accept_response(request_id, data) {
                debug!(request_id, "Stale response dropped");
                return (state, Vec::new());
            }
            let mut effects = vec![Effect::Persist(state.snapshot())];
            if let Some(text) = state.narrative_text() {
                effects.push(Effect::StartTyping(text));
            }
            effects
        }
        Msg::RequestFailed { request_id, message } => {
            if !state.fail_request(request_id, message) {
                debug!(request_id, "Stale failure dropped");
            }
            Vec::new()
        }
        Msg::ClearRequested => {
            state.set_confirm_clear(true);
            Vec::new()
        }
        Msg::ClearCancelled => {
            state.set_confirm_clear(false);
            Vec::new()
        }
        Msg::ClearConfirmed => {
            if !state.confirm_clear_pending() {
                return (state, Vec::new());
            }
            state.reset();
            vec![Effect::CancelTyping, Effect::ClearPersisted]
        }
        Msg::Restore(snapshot) => {
            state.restore(snapshot);
            state.narrative_text().map(Effect::ShowNarrative).into_iter().collect()
        }
    };

    (state, effects)
}
