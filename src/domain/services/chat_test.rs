use test_utils::strategy_fixture;
use test_utils::strategy_without_voice_fixture;

use super::system_instruction;
use super::ChatSession;
use super::APOLOGY;
use super::EMPTY_REPLY;
use super::GENERIC_INSTRUCTION;
use crate::domain::models::BrandStrategy;
use crate::domain::models::Role;
use crate::domain::services::fakes::as_backend;
use crate::domain::services::fakes::Call;
use crate::domain::services::fakes::FakeBackend;

fn strategy() -> BrandStrategy {
    return serde_json::from_str(strategy_fixture()).unwrap();
}

fn sent_instructions(fake: &FakeBackend) -> Vec<Option<String>> {
    return fake
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Chat {
                system_instruction, ..
            } => return Some(system_instruction),
            _ => return None,
        })
        .collect();
}

fn sent_contexts(fake: &FakeBackend) -> Vec<String> {
    return fake
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Chat {
                backend_context, ..
            } => return Some(backend_context),
            _ => return None,
        })
        .collect();
}

#[test]
fn it_builds_a_generic_instruction() {
    assert_eq!(system_instruction(None), GENERIC_INSTRUCTION);
}

#[test]
fn it_builds_a_strategy_instruction() {
    insta::assert_snapshot!(system_instruction(Some(&strategy())), @r###"
    You are the Brand Assistant for a company with the following identity:
    Colors: Dark Roast, Cascade Moss, Oat Crema, Kiln Ember, Sound Fog.
    Fonts: Playfair Display & Inter.
    Voice: Warm, grounded and quietly confident.
    Help the user refine their brand, suggest marketing copy, or explain design choices.
    "###);
}

#[test]
fn it_handles_strategies_without_voice() {
    let strategy: BrandStrategy = serde_json::from_str(strategy_without_voice_fixture()).unwrap();
    let instruction = system_instruction(Some(&strategy));

    assert!(instruction.contains("Colors: Midnight."));
    assert!(instruction.contains("Fonts: Montserrat & Lora."));
    assert!(instruction.contains("Voice: not specified"));
}

#[tokio::test]
async fn it_seeds_messages_with_the_strategy() {
    let fake = FakeBackend::default().chat_reply(Some("Sure!")).shared();
    let mut session = ChatSession::new(as_backend(&fake));
    let strategy = strategy();

    session.init(Some(&strategy));
    let reply = session.send_message("x").await.unwrap();
    assert_eq!(reply, "Sure!");

    let instruction = sent_instructions(&fake)[0].clone().unwrap();
    for color in strategy.colors.iter() {
        assert!(instruction.contains(&color.name));
    }
    assert!(instruction.contains(&strategy.typography.header_font));
    assert!(instruction.contains(&strategy.typography.body_font));
}

#[tokio::test]
async fn it_lazily_initializes_a_generic_session() {
    let fake = FakeBackend::default().chat_reply(Some("Hello!")).shared();
    let mut session = ChatSession::new(as_backend(&fake));
    assert!(!session.is_initialized());

    session.send_message("Hi").await.unwrap();

    assert!(session.is_initialized());
    assert_eq!(
        sent_instructions(&fake),
        vec![Some(GENERIC_INSTRUCTION.to_string())]
    );
}

#[tokio::test]
async fn it_carries_history_between_turns() {
    let fake = FakeBackend::default().chat_reply(Some("Ok")).shared();
    let mut session = ChatSession::new(as_backend(&fake));

    session.send_message("one").await.unwrap();
    session.send_message("two").await.unwrap();

    assert_eq!(sent_contexts(&fake), vec!["".to_string(), "|one".to_string()]);
}

#[tokio::test]
async fn it_discards_history_on_reinit() {
    let fake = FakeBackend::default().chat_reply(Some("Ok")).shared();
    let mut session = ChatSession::new(as_backend(&fake));

    session.send_message("one").await.unwrap();
    session.init(Some(&strategy()));
    assert!(session.messages().is_empty());

    session.send_message("two").await.unwrap();

    assert_eq!(sent_contexts(&fake), vec!["".to_string(), "".to_string()]);
    let texts = session
        .messages()
        .iter()
        .map(|message| return message.text.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(texts, vec!["two", "Ok"]);
}

#[tokio::test]
async fn it_falls_back_on_empty_replies() {
    let fake = FakeBackend::default().chat_reply(Some("  ")).shared();
    let mut session = ChatSession::new(as_backend(&fake));

    assert_eq!(session.send_message("Hi").await.unwrap(), EMPTY_REPLY);

    let fake = FakeBackend::default().chat_reply(None).shared();
    let mut session = ChatSession::new(as_backend(&fake));

    assert_eq!(session.send_message("Hi").await.unwrap(), EMPTY_REPLY);
}

#[tokio::test]
async fn it_keeps_state_intact_on_failures() {
    let failing = FakeBackend::default().failing_chat().shared();
    let mut failing_session = ChatSession::new(as_backend(&failing));
    failing_session.send_message("one").await.unwrap_err();
    failing_session.send_message("two").await.unwrap_err();

    assert_eq!(sent_contexts(&failing), vec!["".to_string(), "".to_string()]);
    assert_eq!(failing_session.messages().len(), 4);
    assert_eq!(failing_session.messages()[1].role, Role::Model);
    assert_eq!(failing_session.messages()[1].text, APOLOGY);
}

#[tokio::test]
async fn it_replies_with_an_apology_on_failures() {
    let fake = FakeBackend::default().failing_chat().shared();
    let mut session = ChatSession::new(as_backend(&fake));

    assert_eq!(session.reply("Hi").await, APOLOGY);
}

#[tokio::test]
async fn it_ignores_blank_messages() {
    let fake = FakeBackend::default().shared();
    let mut session = ChatSession::new(as_backend(&fake));

    assert!(session.send_message("   ").await.unwrap_err().is_validation());
    assert!(fake.calls().is_empty());
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn it_records_the_transcript_in_order() {
    let fake = FakeBackend::default().chat_reply(Some("Roasted for the rain.")).shared();
    let mut session = ChatSession::new(as_backend(&fake));

    session.send_message("Suggest a tagline").await.unwrap();

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "Suggest a tagline");
    assert_eq!(messages[1].role, Role::Model);
    assert_eq!(messages[1].text, "Roasted for the rain.");
    assert!(messages[0].timestamp <= messages[1].timestamp);
}
