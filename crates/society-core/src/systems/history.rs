//! End-of-turn bookkeeping for per-agent resource trends.

use bevy_ecs::prelude::*;

use crate::components::agent::ResourceHistory;
use crate::economy::WorldEngine;

/// System: every agent records the world as it stands at the end of the turn
pub fn record_resource_history(engine: Res<WorldEngine>, mut query: Query<&mut ResourceHistory>) {
    let snapshot = engine.observe();
    for mut history in query.iter_mut() {
        history.record(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::RESOURCE_HISTORY_LIMIT;

    #[test]
    fn test_history_is_recorded_and_bounded() {
        let mut world = World::new();
        world.insert_resource(WorldEngine::default());
        let entity = world.spawn(ResourceHistory::default()).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(record_resource_history);
        for _ in 0..6 {
            schedule.run(&mut world);
            world.resource_mut::<WorldEngine>().advance_turn();
        }

        let history = world.get::<ResourceHistory>(entity).unwrap();
        assert_eq!(history.len(), RESOURCE_HISTORY_LIMIT);
        assert_eq!(history.last(1)[0].turn, 5);
    }
}
