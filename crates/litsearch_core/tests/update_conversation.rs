use std::sync::Once;

use litsearch_core::{
    update, Answer, AppState, Effect, Msg, Role, Source, ABSTRACT_SECTION, ASK_FAILURE_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(litsearch_logging::initialize_for_tests);
}

fn conversation() -> AppState {
    let (state, _) = update(AppState::new(), Msg::OpenConversation);
    state
}

fn ask(state: AppState, question: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::QuestionSubmitted(question.to_string()))
}

fn pending_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SendQuestion { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("send question effect")
}

fn abstract_source() -> Source {
    Source {
        arxiv_id: "2301.00001".into(),
        title: "X".into(),
        section: "Abstract".into(),
        excerpt: "We study graph neural networks...".into(),
        url: "https://arxiv.org/abs/2301.00001".into(),
        score: 0.93,
    }
}

fn transcript_len(state: &AppState) -> usize {
    state.conversation().unwrap().transcript().len()
}

#[test]
fn ask_appends_user_message_before_the_request_settles() {
    init_logging();
    let (mut state, effects) = ask(conversation(), "  What are the main findings? ");

    assert_eq!(
        effects,
        vec![Effect::SendQuestion {
            request_id: 1,
            question: "What are the main findings?".into(),
        }]
    );
    let conv = state.conversation().unwrap();
    assert_eq!(conv.transcript().len(), 1);
    assert_eq!(conv.transcript()[0].role(), Role::User);
    assert_eq!(conv.transcript()[0].content(), "What are the main findings?");
    assert_eq!(conv.pending(), Some(1));
    assert!(state.view().as_conversation().unwrap().pending);
    assert!(state.consume_dirty());
}

#[test]
fn scenario_e_answer_carries_sources_verbatim() {
    init_logging();
    let (state, effects) = ask(conversation(), "What are the main findings?");
    let request_id = pending_id(&effects);

    let (state, effects) = update(
        state,
        Msg::AnswerReceived {
            request_id,
            result: Ok(Answer {
                answer: "GNNs generalise well [arXiv:2301.00001].".into(),
                sources: vec![abstract_source()],
            }),
        },
    );

    assert!(effects.is_empty());
    let conv = state.conversation().unwrap();
    assert!(!conv.is_pending());
    let reply = &conv.transcript()[1];
    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(reply.content(), "GNNs generalise well [arXiv:2301.00001].");
    assert_eq!(reply.sources(), Some(&[abstract_source()][..]));

    let view = state.view();
    let citation = &view.as_conversation().unwrap().messages[1].citations[0];
    assert_eq!(citation.relevance_label, "93% pertinent");
    assert_eq!(citation.relevance_percent, 93);
    assert!(citation.is_abstract);
    assert_eq!(citation.section, ABSTRACT_SECTION);
    assert_eq!(citation.url, "https://arxiv.org/abs/2301.00001");
    assert_eq!(citation.excerpt, "We study graph neural networks...");
    assert_eq!(citation.index, 1);
}

#[test]
fn scenario_f_failure_appends_apology_without_sources() {
    init_logging();
    let (state, effects) = ask(conversation(), "What are the main findings?");
    let request_id = pending_id(&effects);

    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id,
            result: Err("network error: connection reset".into()),
        },
    );

    let conv = state.conversation().unwrap();
    assert!(!conv.is_pending());
    let reply = &conv.transcript()[1];
    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(reply.content(), ASK_FAILURE_MESSAGE);
    assert_eq!(reply.sources(), None);
}

#[test]
fn every_ask_grows_transcript_by_exactly_two() {
    init_logging();
    let mut state = conversation();
    for round in 0..20 {
        let before = transcript_len(&state);
        let (next, effects) = ask(state, &format!("question {round}"));
        let request_id = pending_id(&effects);
        let result = if round % 3 == 0 {
            Err("http status 400: Corpus is empty. Please add papers first.".to_string())
        } else {
            Ok(Answer {
                answer: format!("answer {round}"),
                sources: Vec::new(),
            })
        };
        let (next, _) = update(next, Msg::AnswerReceived { request_id, result });
        assert_eq!(transcript_len(&next), before + 2);
        assert!(!next.conversation().unwrap().is_pending());
        state = next;
    }

    // Strict user/assistant alternation in submission order.
    let roles: Vec<_> = state
        .conversation()
        .unwrap()
        .transcript()
        .iter()
        .map(|message| message.role())
        .collect();
    for pair in roles.chunks(2) {
        assert_eq!(pair, [Role::User, Role::Assistant]);
    }
    assert_eq!(
        state.conversation().unwrap().transcript()[2].content(),
        "question 1"
    );
}

#[test]
fn second_question_is_rejected_while_pending() {
    init_logging();
    let (state, _) = ask(conversation(), "first");
    let (state, effects) = ask(state, "second");

    assert!(effects.is_empty());
    assert_eq!(transcript_len(&state), 1);
}

#[test]
fn blank_question_is_ignored() {
    init_logging();
    let state = conversation();
    let (next, effects) = ask(state.clone(), " \n ");
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn stale_or_unknown_answers_are_dropped() {
    init_logging();
    let (state, effects) = ask(conversation(), "first");
    let request_id = pending_id(&effects);

    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id: request_id + 41,
            result: Ok(Answer::default()),
        },
    );
    assert_eq!(transcript_len(&state), 1);
    assert!(state.conversation().unwrap().is_pending());

    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id,
            result: Ok(Answer::default()),
        },
    );
    // A duplicate delivery after settling changes nothing.
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id,
            result: Err("late".into()),
        },
    );
    assert_eq!(transcript_len(&state), 2);
}

#[test]
fn request_ids_increase_per_question() {
    init_logging();
    let (state, effects) = ask(conversation(), "one");
    let first = pending_id(&effects);
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id: first,
            result: Ok(Answer::default()),
        },
    );
    let (_, effects) = ask(state, "two");
    assert!(pending_id(&effects) > first);
}

#[test]
fn empty_source_list_is_stored_as_absent() {
    init_logging();
    let (state, effects) = ask(conversation(), "anything?");
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id: pending_id(&effects),
            result: Ok(Answer {
                answer: "No relevant information found in the corpus.".into(),
                sources: Vec::new(),
            }),
        },
    );
    let conv = state.conversation().unwrap();
    assert_eq!(conv.transcript()[1].sources(), None);
}

#[test]
fn questions_before_navigation_are_ignored() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = ask(state.clone(), "too early");
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn rendering_the_same_transcript_is_idempotent() {
    init_logging();
    let (state, effects) = ask(conversation(), "What are the main findings?");
    let body = Source {
        section: "Body".into(),
        score: 0.61,
        ..abstract_source()
    };
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request_id: pending_id(&effects),
            result: Ok(Answer {
                answer: "...".into(),
                sources: vec![abstract_source(), body],
            }),
        },
    );

    let first = state.view();
    let second = state.clone().view();
    assert_eq!(first, second);

    let citations = &first.as_conversation().unwrap().messages[1].citations;
    let grouping: Vec<_> = citations
        .iter()
        .map(|c| (c.index, c.is_abstract, c.relevance_percent))
        .collect();
    assert_eq!(grouping, vec![(1, true, 93), (2, false, 61)]);
}
