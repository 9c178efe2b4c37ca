//! Agent protocol tests: parsing, framing and request handling against a live duel.

use buckshot_duel::chamber::Shell;
use buckshot_duel::core::{ActionType, ItemCode, SessionConfig, Side};
use buckshot_duel::duel::{Duel, DuelBuilder};
use buckshot_duel::observation::{Observation, OBSERVATION_LEN};
use buckshot_duel::protocol::{dispatch, MessageFramer, ProtocolError, Request, StepReply};

fn agent_b() -> SessionConfig {
    SessionConfig::default().with_agent_sides(vec![Side::B])
}

fn duel_with_first(side: Side, max_lives: u32) -> Duel {
    DuelBuilder::new()
        .seed(21)
        .first_turn(side)
        .max_lives(max_lives)
        .auto_start(true)
        .build()
        .unwrap()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_verbs() {
    assert_eq!(Request::parse("get_state"), Ok(Request::GetState));
    assert_eq!(Request::parse("reset\r\n"), Ok(Request::Reset));
    assert_eq!(Request::parse("play_step:3"), Ok(Request::PlayStep(3)));
    assert_eq!(Request::parse(" play_step : 0 "), Ok(Request::PlayStep(0)));
}

#[test]
fn test_parse_rejects_malformed() {
    assert_eq!(Request::parse("   "), Err(ProtocolError::Empty));
    assert_eq!(Request::parse("play_step"), Err(ProtocolError::MissingArgument));
    assert_eq!(Request::parse("play_step:"), Err(ProtocolError::MissingArgument));
    assert!(matches!(
        Request::parse("play_step:-1"),
        Err(ProtocolError::BadIndex(_))
    ));
    assert!(matches!(
        Request::parse("fire"),
        Err(ProtocolError::UnknownVerb(v)) if v == "fire"
    ));
}

#[test]
fn test_framer_modes() {
    let mut chunked = MessageFramer::new(false);
    assert_eq!(chunked.push("get_state"), vec!["get_state"]);
    assert_eq!(
        chunked.push("play_step:1\nget_state\n"),
        vec!["play_step:1", "get_state"]
    );

    let mut lines = MessageFramer::new(true);
    assert!(lines.push("play_st").is_empty());
    assert_eq!(lines.push("ep:2\nres"), vec!["play_step:2"]);
    assert_eq!(lines.push("et\n"), vec!["reset"]);
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_get_state_on_agent_turn() {
    let mut duel = duel_with_first(Side::B, 4);
    let reply = dispatch(&mut duel, &agent_b(), Request::GetState)
        .unwrap()
        .unwrap();

    let fields: Vec<&str> = reply.split(',').collect();
    assert_eq!(fields.len(), OBSERVATION_LEN);
    let observation = Observation::parse_csv(&reply).unwrap();
    assert_eq!(observation.turn_flag, 0);
    assert_eq!(observation.lives, [4, 4]);
    assert_eq!(observation.gun_damage, 1);
    assert_eq!(observation.knowledge, 2);
}

#[test]
fn test_requests_ignored_off_turn() {
    let mut duel = duel_with_first(Side::A, 4);
    let config = agent_b();
    assert_eq!(dispatch(&mut duel, &config, Request::GetState), Ok(None));
    assert_eq!(dispatch(&mut duel, &config, Request::PlayStep(1)), Ok(None));
    assert!(duel.history().is_empty());
}

#[test]
fn test_play_step_reports_post_action_state() {
    let mut duel = duel_with_first(Side::B, 4);
    duel.load_chamber(vec![Shell::Blank, Shell::Live]);

    let reply = dispatch(&mut duel, &agent_b(), Request::PlayStep(1))
        .unwrap()
        .unwrap();
    assert!(reply.ends_with(":10:False"));

    let parsed = StepReply::parse(&reply).unwrap();
    assert_eq!(parsed.reward, 10.0);
    assert!(!parsed.match_over);
    assert_eq!(parsed.observation.lives, [3, 4]);
    assert_eq!(parsed.observation.turn_flag, 1);
    assert_eq!(parsed.observation.chamber_depth, 1);
}

#[test]
fn test_play_step_out_of_range_is_penalized() {
    let mut duel = duel_with_first(Side::B, 4);
    let config = agent_b();

    let first = dispatch(&mut duel, &config, Request::PlayStep(7)).unwrap().unwrap();
    assert_eq!(StepReply::parse(&first).unwrap().reward, -50.0);

    let second = dispatch(&mut duel, &config, Request::PlayStep(usize::MAX))
        .unwrap()
        .unwrap();
    assert_eq!(StepReply::parse(&second).unwrap().reward, -51.0);
    assert_eq!(duel.current_turn(), Some(Side::B));
}

#[test]
fn test_match_over_then_reset() {
    let mut duel = duel_with_first(Side::B, 1);
    let config = agent_b();
    duel.load_chamber(vec![Shell::Live]);

    let reply = dispatch(&mut duel, &config, Request::PlayStep(1))
        .unwrap()
        .unwrap();
    let parsed = StepReply::parse(&reply).unwrap();
    assert!(parsed.match_over);
    assert_eq!(parsed.reward, 60.0);
    assert_eq!(parsed.observation.turn_flag, 0);
    assert_eq!(parsed.observation.chamber_depth, 0);

    assert_eq!(dispatch(&mut duel, &config, Request::GetState), Ok(None));
    assert_eq!(dispatch(&mut duel, &config, Request::PlayStep(0)), Ok(None));

    assert_eq!(dispatch(&mut duel, &config, Request::Reset), Ok(None));
    assert!(!duel.is_match_over());
    assert_eq!(duel.current_turn(), Some(Side::B));
    assert!(dispatch(&mut duel, &config, Request::GetState).unwrap().is_some());
}

#[test]
fn test_reset_ignored_mid_match() {
    let mut duel = duel_with_first(Side::B, 4);
    duel.grant_item(Side::B, ItemCode::Cigar);
    let before = duel.inventory().clone();

    assert_eq!(dispatch(&mut duel, &agent_b(), Request::Reset), Ok(None));
    assert_eq!(duel.inventory(), &before);
    assert_eq!(duel.round(), 1);
}

#[test]
fn test_item_indices_follow_action_order() {
    let mut duel = duel_with_first(Side::B, 4);
    duel.load_chamber(vec![Shell::Live, Shell::Blank]);
    duel.grant_item(Side::B, ItemCode::MagnifyingGlass);

    let index = ActionType::MagGlass.index();
    let reply = dispatch(&mut duel, &agent_b(), Request::PlayStep(index))
        .unwrap()
        .unwrap();
    let parsed = StepReply::parse(&reply).unwrap();
    // Blank on top is now known.
    assert_eq!(parsed.observation.knowledge, 0);
    assert_eq!(parsed.observation.turn_flag, 0);
}
