//! Property-based tests for the session state machine

use super::http::AskError;
use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_document_id() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,12}"
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![Just(SessionState::Idle), Just(SessionState::Submitting)]
}

fn arb_context() -> impl Strategy<Value = SessionContext> {
    proptest::option::of(arb_document_id()).prop_map(|document_id| SessionContext { document_id })
}

fn arb_ask_error() -> impl Strategy<Value = AskError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(AskError::Transport),
        Just(AskError::Timeout),
        ((400u16..600), "[a-z ]{1,20}")
            .prop_map(|(status, message)| AskError::Status { status, message }),
        "[a-z ]{1,20}".prop_map(AskError::Payload),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[ a-zA-Z?.]{0,30}".prop_map(|text| Event::InputSubmitted { text }),
        arb_document_id().prop_map(|id| Event::DocumentSelected { id }),
        "[a-zA-Z .]{0,40}".prop_map(|answer| Event::AskSucceeded { answer }),
        arb_ask_error().prop_map(|error| Event::AskFailed { error }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Same inputs, same outputs: the transition does no I/O.
    #[test]
    fn prop_transition_is_deterministic(
        state in arb_state(),
        ctx in arb_context(),
        event in arb_event()
    ) {
        let first = transition(&state, &ctx, event.clone());
        let second = transition(&state, &ctx, event);
        prop_assert_eq!(first.new_state, second.new_state);
        prop_assert_eq!(first.effects, second.effects);
    }

    // An ask can only start from Idle with a document selected, and
    // always moves the session to Submitting.
    #[test]
    fn prop_send_ask_requires_idle_and_document(
        state in arb_state(),
        ctx in arb_context(),
        event in arb_event()
    ) {
        let result = transition(&state, &ctx, event);
        let sends_ask = result.effects.iter().any(|e| matches!(e, Effect::SendAsk { .. }));
        if sends_ask {
            prop_assert_eq!(state, SessionState::Idle);
            prop_assert!(ctx.document_id.is_some());
            prop_assert_eq!(result.new_state, SessionState::Submitting);
        }
    }

    // Entering Submitting always carries the ask that justifies it.
    #[test]
    fn prop_submitting_always_carries_an_ask(
        ctx in arb_context(),
        event in arb_event()
    ) {
        let result = transition(&SessionState::Idle, &ctx, event);
        if result.new_state == SessionState::Submitting {
            prop_assert!(
                result.effects.iter().any(|e| matches!(e, Effect::SendAsk { .. })),
                "entered Submitting without a SendAsk effect: {:?}",
                result.effects
            );
        }
    }

    // While a question is in flight, only its completion moves the
    // session; everything else is inert.
    #[test]
    fn prop_submitting_only_reacts_to_completions(
        ctx in arb_context(),
        event in arb_event()
    ) {
        let result = transition(&SessionState::Submitting, &ctx, event.clone());
        match event {
            Event::AskSucceeded { .. } | Event::AskFailed { .. } => {
                prop_assert_eq!(result.new_state, SessionState::Idle);
            }
            _ => {
                prop_assert_eq!(result.new_state, SessionState::Submitting);
                prop_assert!(result.effects.is_empty());
            }
        }
    }

    // Completions that arrive once the session is already Idle are
    // stale and change nothing.
    #[test]
    fn prop_idle_ignores_completions(
        ctx in arb_context(),
        answer in "[a-zA-Z .]{0,40}",
        error in arb_ask_error()
    ) {
        let succeeded = transition(&SessionState::Idle, &ctx, Event::AskSucceeded { answer });
        prop_assert_eq!(succeeded.new_state, SessionState::Idle);
        prop_assert!(succeeded.effects.is_empty());

        let failed = transition(&SessionState::Idle, &ctx, Event::AskFailed { error });
        prop_assert_eq!(failed.new_state, SessionState::Idle);
        prop_assert!(failed.effects.is_empty());
    }

    // Whitespace-only input never does anything.
    #[test]
    fn prop_blank_input_is_inert(
        state in arb_state(),
        ctx in arb_context(),
        text in "[ \t\r\n]{0,8}"
    ) {
        let result = transition(&state, &ctx, Event::InputSubmitted { text });
        prop_assert_eq!(result.new_state, state);
        prop_assert!(result.effects.is_empty());
    }

    // The transcript is only cleared as part of a document switch.
    #[test]
    fn prop_clear_and_set_document_travel_together(
        state in arb_state(),
        ctx in arb_context(),
        event in arb_event()
    ) {
        let result = transition(&state, &ctx, event);
        let clears = result.effects.iter().any(|e| matches!(e, Effect::ClearTranscript));
        let sets = result.effects.iter().any(|e| matches!(e, Effect::SetDocument(_)));
        prop_assert_eq!(clears, sets);
    }

    // Selecting a document never moves the session state.
    #[test]
    fn prop_selection_never_changes_state(
        state in arb_state(),
        ctx in arb_context(),
        id in arb_document_id()
    ) {
        let result = transition(&state, &ctx, Event::DocumentSelected { id });
        prop_assert_eq!(result.new_state, state);
    }
}

// ============================================================================
// Sequence Tests
// ============================================================================

/// Select a document, ask a question, receive the answer.
#[test]
fn full_question_cycle() {
    let result = transition(
        &SessionState::Idle,
        &SessionContext::default(),
        Event::DocumentSelected {
            id: "doc-1".to_string(),
        },
    );
    assert_eq!(result.new_state, SessionState::Idle);
    assert!(result
        .effects
        .contains(&Effect::SetDocument("doc-1".to_string())));

    // The runtime applies SetDocument to the context.
    let ctx = SessionContext {
        document_id: Some("doc-1".to_string()),
    };

    let result = transition(
        &SessionState::Idle,
        &ctx,
        Event::InputSubmitted {
            text: "What is it?".to_string(),
        },
    );
    assert_eq!(result.new_state, SessionState::Submitting);

    let result = transition(
        &result.new_state,
        &ctx,
        Event::AskSucceeded {
            answer: "A guide.".to_string(),
        },
    );
    assert_eq!(result.new_state, SessionState::Idle);
    assert_eq!(
        result.effects,
        vec![Effect::AppendTurn(Turn::assistant("A guide."))]
    );
}
