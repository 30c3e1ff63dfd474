//! End-to-end turn economy tests
//!
//! Drives the controller with scripted proposers and checks the economy,
//! ledger, and halting behavior across whole turns.

use society_core::components::social::bounds;
use society_core::config::{PersonaConfig, SimulationConfig};
use society_core::systems::{compose, evaluate_goals, GoalThresholds};
use society_core::{
    EmotionLedger, EmotionVector, GoalSlot, InterpersonalGoals, Rejection, ScriptedProposer,
    TurnController, WeightedProposer, WorldEngine, WorldState,
};
use society_events::{
    Action, ActionKind, ActionType, HaltReason, ResourceKind, TerminalReason, WORLD_TARGET,
};

fn config(names: &[&str]) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.personas = names
        .iter()
        .map(|name| PersonaConfig {
            name: name.to_string(),
            archetype: "Guardian".to_string(),
            description: String::new(),
            goals: Vec::new(),
            ambition: 0.0,
        })
        .collect();
    config
}

fn agents() -> Vec<String> {
    vec!["Ada".to_string(), "Bram".to_string()]
}

#[test]
fn test_improve_energy_scenario() {
    let mut engine = WorldEngine::default();
    engine
        .apply_action("Ada", &Action::resource(ActionType::ImproveEnergy), &agents())
        .unwrap();

    let snapshot = engine.observe();
    assert_eq!(snapshot.treasury, 47);
    assert_eq!(snapshot.energy, 58);
    // (47 + 58 + 150) / 5 = 51
    assert_eq!(snapshot.crisis_level, 49);
}

#[test]
fn test_unaffordable_action_leaves_state_identical() {
    let mut engine = WorldEngine::new(
        WorldState::with_resources(3, 50, 50, 50, 50),
        Default::default(),
    );
    engine
        .apply_action("Bram", &Action::support("Ada"), &agents())
        .unwrap();
    let before = engine.state().clone();

    let result = engine.apply_action(
        "Ada",
        &Action::resource(ActionType::ImproveInfrastructure),
        &agents(),
    );

    assert!(matches!(
        result,
        Err(Rejection::InsufficientResource {
            resource: ResourceKind::Treasury,
            needed: 4,
            held: 3
        })
    ));
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_terminal_precedence_prefers_starvation() {
    let engine = WorldEngine::new(
        WorldState::with_resources(50, 0, 50, 50, 50),
        Default::default(),
    );
    assert_eq!(engine.check_terminal(), Some(TerminalReason::Starvation));

    let both = WorldEngine::new(WorldState::with_resources(0, 0, 0, 0, 0), Default::default());
    assert_eq!(both.check_terminal(), Some(TerminalReason::Starvation));
}

#[test]
fn test_energy_collapse_halts_run() {
    let mut config = config(&["Ada"]);
    config.world.energy = 0;
    config.world.treasury = 0;
    config.world.infrastructure = 10;
    config.world.morale = 3;
    let mut controller = TurnController::new(&config, ScriptedProposer::new()).unwrap();

    let summary = controller.run().unwrap();

    assert_eq!(
        summary.halt_reason,
        HaltReason::Terminal(TerminalReason::EnergyCollapse)
    );
    assert_eq!(summary.turns_played, 1);
}

#[test]
fn test_reserved_persona_name_fails_setup() {
    let result = TurnController::new(&config(&["Ada", "World"]), ScriptedProposer::new());
    assert!(result.is_err());
}

#[test]
fn test_modifier_is_consumed_once() {
    let proposer = ScriptedProposer::new()
        .with("Ada", [Action::support("Bram"), Action::pass()])
        .with(
            "Bram",
            [
                Action::resource(ActionType::ImproveInfrastructure),
                Action::resource(ActionType::ImproveInfrastructure),
            ],
        );
    let mut controller = TurnController::new(&config(&["Ada", "Bram"]), proposer).unwrap();

    controller.run_turn().unwrap();
    // 50 + floor(8 * 1.5), then decay
    assert_eq!(controller.snapshot().infrastructure, 60);
    assert_eq!(controller.snapshot().treasury, 44);

    controller.run_turn().unwrap();
    // 60 + 8, then decay
    assert_eq!(controller.snapshot().infrastructure, 66);
    assert!(controller.snapshot().cost_modifiers.is_empty());
}

#[test]
fn test_later_agents_see_earlier_social_actions() {
    let proposer = ScriptedProposer::new()
        .with("Ada", [Action::oppose("Cato")])
        .with("Bram", [Action::support("Cato")]);
    let mut controller =
        TurnController::new(&config(&["Ada", "Bram", "Cato"]), proposer).unwrap();

    controller.run_turn().unwrap();

    let observations = controller.proposer().observations();
    let cato = &observations[2];
    assert_eq!(cato.agent, "Cato");
    assert_eq!(cato.targeted_by.len(), 2);
    assert_eq!(cato.targeted_by[0].actor, "Ada");
    assert!(cato
        .triggers
        .iter()
        .any(|t| t.contains("targeted by other agents")));
    // Bram's support replaced Ada's opposition
    assert_eq!(
        cato.modifier,
        Some(society_events::CostModifier::Boosted)
    );
    assert!(observations[0].targeted_by.is_empty());
}

#[test]
fn test_message_arrives_next_turn_with_tone() {
    let proposer = ScriptedProposer::new().with(
        "Ada",
        [Action::message("bram", "Thank you, friend. Let's cooperate.")],
    );
    let mut controller = TurnController::new(&config(&["Ada", "Bram"]), proposer).unwrap();

    controller.run_turn().unwrap();
    let first = &controller.proposer().observations()[1];
    assert!(first.messages.is_empty());
    assert_eq!(first.targeted_by[0].action_type, ActionType::SendMessage);

    controller.run_turn().unwrap();
    let second = &controller.proposer().observations()[3];
    assert_eq!(second.agent, "Bram");
    assert_eq!(
        second.messages,
        vec!["From Ada: \"Thank you, friend. Let's cooperate.\"".to_string()]
    );

    // send_message +1 on broadcast, friendly +3 on delivery
    let relationship = controller.relationships("Bram").unwrap().get("Ada").unwrap();
    assert_eq!(relationship.trust, 4);
}

#[test]
fn test_failed_action_is_reported_without_mutation() {
    let proposer = ScriptedProposer::new().with(
        "Ada",
        [Action::new(ActionType::ImproveFood, "Bram")],
    );
    let mut controller = TurnController::new(&config(&["Ada", "Bram"]), proposer).unwrap();

    controller.run_turn().unwrap();

    let event = &controller.events()[0];
    assert!(!event.success);
    assert!(event.history_line().contains("tried improve_food but failed"));
    // Only decay touched food
    assert_eq!(controller.snapshot().food, 48);
}

#[test]
fn test_halts_after_two_all_pass_turns() {
    let mut controller =
        TurnController::new(&config(&["Ada", "Bram"]), ScriptedProposer::new()).unwrap();

    let summary = controller.run().unwrap();

    assert_eq!(summary.halt_reason, HaltReason::AllPassed);
    assert_eq!(summary.turns_played, 2);
    assert_eq!(summary.total_events, 4);
    assert_eq!(summary.failed_actions, 0);
}

#[test]
fn test_halts_on_terminal_condition() {
    let mut config = config(&["Ada"]);
    config.world.food = 0;
    let proposer =
        ScriptedProposer::new().with("Ada", [Action::resource(ActionType::GenerateTreasury)]);
    let mut controller = TurnController::new(&config, proposer).unwrap();

    let summary = controller.run().unwrap();

    assert_eq!(
        summary.halt_reason,
        HaltReason::Terminal(TerminalReason::Starvation)
    );
    assert_eq!(summary.turns_played, 1);
}

#[test]
fn test_halts_at_max_turns() {
    let mut config = config(&["Ada"]);
    config.simulation.max_turns = 3;
    let food = std::iter::repeat_with(|| Action::resource(ActionType::ImproveFood)).take(5);
    let proposer = ScriptedProposer::new().with("Ada", food);
    let mut controller = TurnController::new(&config, proposer).unwrap();

    let summary = controller.run().unwrap();

    assert_eq!(summary.halt_reason, HaltReason::MaxTurns);
    assert_eq!(summary.turns_played, 3);
    assert_eq!(summary.final_state.turn, 3);
}

#[test]
fn test_repeated_support_sets_ally_goal() {
    let supports = std::iter::repeat_with(|| Action::support("Bram")).take(4);
    let proposer = ScriptedProposer::new().with("Ada", supports);
    let mut controller = TurnController::new(&config(&["Ada", "Bram"]), proposer).unwrap();

    for _ in 0..3 {
        controller.run_turn().unwrap();
    }
    // Emotional trust is exactly 15, not above it
    assert_eq!(controller.goals("Bram").unwrap().get(GoalSlot::AllyWith), None);

    controller.run_turn().unwrap();
    assert_eq!(
        controller.goals("Bram").unwrap().get(GoalSlot::AllyWith),
        Some("Ada")
    );
}

#[test]
fn test_goal_hysteresis() {
    let thresholds = GoalThresholds::default();
    let mut goals = InterpersonalGoals::default();
    let mut emotions = EmotionVector {
        trust: 16.0,
        ..EmotionVector::default()
    };

    evaluate_goals(&mut goals, "Ada", &emotions, 50, 0.0, &thresholds);
    assert_eq!(goals.get(GoalSlot::AllyWith), Some("Ada"));

    emotions.trust = 11.0;
    evaluate_goals(&mut goals, "Ada", &emotions, 50, 0.0, &thresholds);
    assert_eq!(goals.get(GoalSlot::AllyWith), Some("Ada"));

    emotions.trust = 10.0;
    evaluate_goals(&mut goals, "Ada", &emotions, 50, 0.0, &thresholds);
    assert_eq!(goals.get(GoalSlot::AllyWith), None);
}

#[test]
fn test_three_repeats_push_weight_below_competitors() {
    let recent = vec![ActionKind::OpposeAgent; 3];
    let bias = compose(
        "",
        0,
        0.0,
        &EmotionLedger::default(),
        &InterpersonalGoals::default(),
        &recent,
    );

    let oppose = bias[&ActionKind::OpposeAgent];
    for (kind, weight) in &bias {
        if *kind != ActionKind::OpposeAgent {
            assert!(oppose < *weight, "{} should outweigh oppose_agent", kind);
        }
    }
}

#[test]
fn test_long_run_stays_within_bounds() {
    let mut config = SimulationConfig::default();
    config.simulation.max_turns = 40;
    config.world.treasury = 20;
    config.world.morale = 30;
    let mut controller = TurnController::new(&config, WeightedProposer::new(7)).unwrap();

    controller.run().unwrap();

    let limit = bounds::RELATIONSHIP_MAX;
    for name in controller.agent_names().to_vec() {
        for (_, relationship) in controller.relationships(&name).unwrap().iter() {
            assert!(relationship.trust.abs() <= limit);
            assert!(relationship.resentment.abs() <= limit);
        }
        for (_, emotions) in controller.emotions(&name).unwrap().iter() {
            for value in [
                emotions.trust,
                emotions.resentment,
                emotions.admiration,
                emotions.fear,
            ] {
                assert!(value.abs() <= bounds::EMOTION_MAX);
            }
        }
    }
    for event in controller.events() {
        if event.action_type.is_chargeable() && event.success {
            assert_eq!(event.target, WORLD_TARGET);
        }
    }
}
