//! Scenery - Cosmetic world decoration
//!
//! The track is an endless loop: items scroll toward the camera and,
//! once far enough behind it, wrap forward by the full loop length.
//! Trees and buildings re-randomize their roadside placement on wrap so
//! the loop never reads as a pattern.

use serde::{Deserialize, Serialize};
use crate::game::config::GameConfig;

/// Decoration class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneryKind {
    Tree,
    Building,
    Mountain,
    Cloud,
    Marking,
    Barrier,
}

/// One decoration instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneryItem {
    pub id: u32,
    pub kind: SceneryKind,
    pub x: f32,
    /// Height offset; only clouds float
    pub y: f32,
    pub z: f32,
}

impl SceneryItem {
    fn ground(id: u32, kind: SceneryKind, x: f32, z: f32) -> Self {
        Self { id, kind, x, y: 0.0, z }
    }
}

/// Lay out the full static world for one track loop.
pub fn build_world(config: &GameConfig) -> Vec<SceneryItem> {
    let mut items = Vec::new();
    let mut id = 0u32;
    let half_road = config.road_width / 2.0;

    // Clouds drift high above everything
    for _ in 0..35 {
        items.push(SceneryItem {
            id,
            kind: SceneryKind::Cloud,
            x: rand::random::<f32>() * 700.0 - 350.0,
            y: 65.0 + rand::random::<f32>() * 45.0,
            z: rand::random::<f32>() * 550.0 + 50.0,
        });
        id += 1;
    }

    // Tree lines on alternating sides
    for i in 0..200 {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let x = side * (half_road + 10.0 + rand::random::<f32>() * 40.0);
        let z = i as f32 * 11.0 + rand::random::<f32>() * 8.0;
        items.push(SceneryItem::ground(id, SceneryKind::Tree, x, z));
        id += 1;
    }

    // Distant mountains
    for i in 0..20 {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let x = side * (120.0 + rand::random::<f32>() * 100.0);
        let z = 120.0 + i as f32 * 110.0 + rand::random::<f32>() * 60.0;
        items.push(SceneryItem::ground(id, SceneryKind::Mountain, x, z));
        id += 1;
    }

    // Urban blocks further out
    for i in 0..30 {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let x = side * (half_road + 35.0 + rand::random::<f32>() * 50.0);
        let z = i as f32 * 80.0 + 60.0 + rand::random::<f32>() * 40.0;
        items.push(SceneryItem::ground(id, SceneryKind::Building, x, z));
        id += 1;
    }

    // Lane markings: dashed center line plus solid lane edges
    let loop_len = config.track_loop_length as i32;
    let mut z = 0;
    while z < loop_len {
        if z % 36 < 18 {
            items.push(SceneryItem::ground(id, SceneryKind::Marking, 0.0, z as f32));
            id += 1;
        }
        items.push(SceneryItem::ground(id, SceneryKind::Marking, -config.lane_width, z as f32));
        id += 1;
        items.push(SceneryItem::ground(id, SceneryKind::Marking, config.lane_width, z as f32));
        id += 1;
        z += 18;
    }

    // Barriers hugging both road edges
    let mut z = 0;
    while z < loop_len {
        items.push(SceneryItem::ground(id, SceneryKind::Barrier, -half_road - 0.6, z as f32));
        id += 1;
        items.push(SceneryItem::ground(id, SceneryKind::Barrier, half_road + 0.6, z as f32));
        id += 1;
        z += 5;
    }

    items
}

/// Scroll every item toward the camera and wrap the ones that fell
/// behind it.
pub fn scroll(items: &mut [SceneryItem], config: &GameConfig, move_amount: f32) {
    for item in items.iter_mut() {
        item.z -= move_amount;

        if item.z < config.scenery_recycle_z {
            item.z += config.track_loop_length;
            if matches!(item.kind, SceneryKind::Tree | SceneryKind::Building) {
                let side = if rand::random::<f32>() > 0.5 { 1.0 } else { -1.0 };
                item.x = side * (config.road_width / 2.0 + 10.0 + rand::random::<f32>() * 50.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GameConfig {
        GameConfig::championship()
    }

    fn count(items: &[SceneryItem], kind: SceneryKind) -> usize {
        items.iter().filter(|i| i.kind == kind).count()
    }

    #[test]
    fn world_has_the_expected_population() {
        let cfg = cfg();
        let items = build_world(&cfg);

        assert_eq!(count(&items, SceneryKind::Cloud), 35);
        assert_eq!(count(&items, SceneryKind::Tree), 200);
        assert_eq!(count(&items, SceneryKind::Mountain), 20);
        assert_eq!(count(&items, SceneryKind::Building), 30);
        // 2500/5 barrier rows, both sides
        assert_eq!(count(&items, SceneryKind::Barrier), 1000);
        // Edge lines every 18 units, dashed center on every other slot
        let markings = count(&items, SceneryKind::Marking);
        assert_eq!(markings, 139 * 2 + 70);

        // Ids are unique so the frontend can key meshes off them
        let mut ids: Vec<u32> = items.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn trees_and_buildings_stay_off_the_road() {
        let cfg = cfg();
        let items = build_world(&cfg);
        for item in &items {
            if matches!(item.kind, SceneryKind::Tree | SceneryKind::Building) {
                assert!(item.x.abs() > cfg.road_width / 2.0);
            }
        }
    }

    #[test]
    fn items_wrap_forward_by_the_loop_length() {
        let cfg = cfg();
        let mut items = vec![SceneryItem::ground(0, SceneryKind::Barrier, 8.6, -59.5)];

        // One unit of scroll pushes it past the threshold
        scroll(&mut items, &cfg, 1.0);
        assert!((items[0].z - (-60.5 + cfg.track_loop_length)).abs() < 1e-3);
        // Barriers keep their lateral position on wrap
        assert_eq!(items[0].x, 8.6);
    }

    #[test]
    fn trees_rerandomize_laterally_on_wrap() {
        let cfg = cfg();
        let mut items: Vec<SceneryItem> = (0..50)
            .map(|i| SceneryItem::ground(i, SceneryKind::Tree, 18.0, -61.0))
            .collect();

        scroll(&mut items, &cfg, 0.0);
        for item in &items {
            assert!(item.z > 0.0);
            let off_edge = item.x.abs() - cfg.road_width / 2.0;
            assert!((10.0..60.0).contains(&off_edge), "tree at x={}", item.x);
        }
        // With 50 samples, both sides should appear
        assert!(items.iter().any(|i| i.x > 0.0));
        assert!(items.iter().any(|i| i.x < 0.0));
    }

    #[test]
    fn items_in_front_of_the_threshold_do_not_wrap() {
        let cfg = cfg();
        let mut items = vec![SceneryItem::ground(0, SceneryKind::Cloud, 0.0, 100.0)];
        scroll(&mut items, &cfg, 30.0);
        assert_eq!(items[0].z, 70.0);
    }
}
