//! Scene state: the orchestrator the host embeds
//!
//! `DiceScene` owns the tray, the roll clock, and one motion record per die,
//! and turns them into per-frame draw instructions. Hosts feed it container
//! sizes, button presses, and frame deltas; it hands back events and
//! instructions. Nothing in here touches the DOM or the GPU.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::anim::{RollClock, RollPhase, Transition};
use super::layout::{LayoutFrame, compute_layout};
use super::roll::{Aggregation, DieRoller, PcgRoller, RollOutcome, aggregate};
use super::tray::{FaceCount, Tray};
use crate::consts;

/// How dice are presented while rolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiceStyle {
    /// Top-down face only, no tumble
    Flat,
    /// Full 3D tumble while the roll is active
    #[default]
    Spinning,
}

impl DiceStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiceStyle::Flat => "flat",
            DiceStyle::Spinning => "spinning",
        }
    }

    /// The other style, for a toggle key
    pub fn toggled(self) -> DiceStyle {
        match self {
            DiceStyle::Flat => DiceStyle::Spinning,
            DiceStyle::Spinning => DiceStyle::Flat,
        }
    }
}

/// Things that happened during an update the host may care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The current roll reached its settled state. Delivered exactly once
    /// per triggered roll.
    RollFinished,
    /// A die finished its exit and left the tray
    DieRemoved(u32),
}

/// Everything a renderer needs to draw one die this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DieInstruction {
    pub id: u32,
    pub faces: FaceCount,
    /// Center of the die in layout pixels
    pub position: Vec2,
    /// Edge length in layout pixels
    pub scale: f32,
    /// None when the flat style suppresses tumble
    pub rotation: Option<Vec3>,
    /// Result to print on the face, only once the roll has settled
    pub result_label: Option<u32>,
    /// False while a die is too small to be worth drawing
    pub visible: bool,
}

/// Position and scale glides for one die
struct DieMotion {
    die_id: u32,
    position: Transition<Vec2>,
    scale: Transition<f32>,
}

impl DieMotion {
    /// New dice pop into their slot and grow from nothing
    fn enter(die_id: u32, slot: Vec2, scale: f32) -> Self {
        Self {
            die_id,
            position: Transition::settled(slot),
            scale: Transition::running(0.0, scale),
        }
    }
}

/// The deterministic widget core
pub struct DiceScene {
    tray: Tray,
    motions: Vec<DieMotion>,
    clock: RollClock,
    container: Vec2,
    layout: LayoutFrame,
    layout_dirty: bool,
    style: DiceStyle,
    aggregation: Aggregation,
    roller: Box<dyn DieRoller>,
    outcome: Option<RollOutcome>,
}

impl DiceScene {
    pub fn new(seed: u64) -> Self {
        Self::with_roller(Box::new(PcgRoller::new(seed)))
    }

    /// Build with a caller-supplied roller, e.g. a scripted one in tests
    pub fn with_roller(roller: Box<dyn DieRoller>) -> Self {
        Self {
            tray: Tray::new(),
            motions: Vec::new(),
            clock: RollClock::new(),
            container: Vec2::ZERO,
            layout: LayoutFrame::empty(),
            layout_dirty: true,
            style: DiceStyle::default(),
            aggregation: Aggregation::default(),
            roller,
            outcome: None,
        }
    }

    /// Record a new container size. The grid itself is recomputed on the
    /// next `update`, so burst resize reports cost one reflow.
    pub fn set_container_size(&mut self, size: Vec2) {
        if self.container == size {
            return;
        }
        self.container = size;
        self.layout_dirty = true;
    }

    #[inline]
    pub fn container_size(&self) -> Vec2 {
        self.container
    }

    pub fn set_style(&mut self, style: DiceStyle) {
        self.style = style;
    }

    #[inline]
    pub fn style(&self) -> DiceStyle {
        self.style
    }

    /// Applies to rolls triggered after the call
    pub fn set_aggregation(&mut self, aggregation: Aggregation) {
        self.aggregation = aggregation;
    }

    /// Grid from the most recent `update`
    #[inline]
    pub fn layout(&self) -> &LayoutFrame {
        &self.layout
    }

    pub fn add_die(&mut self, faces: FaceCount) -> u32 {
        let id = self.tray.add(faces);
        self.layout_dirty = true;
        id
    }

    /// Mark the most recently added die of this kind for removal. It shrinks
    /// out over the reflow window before leaving the tray.
    pub fn remove_die(&mut self, faces: FaceCount) {
        if self.tray.request_remove(faces).is_some() {
            self.layout_dirty = true;
        }
    }

    /// Roll every live die. Returns false without side effects when the
    /// tray has nothing to roll.
    pub fn roll(&mut self) -> bool {
        if self.tray.live_count() == 0 {
            return false;
        }
        let results = self.tray.roll_all(&mut *self.roller);
        let total = aggregate(&results, self.aggregation);
        log::debug!("rolling {} dice, total {}", results.len(), total);
        self.outcome = Some(RollOutcome {
            results,
            total,
            aggregation: self.aggregation,
        });
        self.clock.trigger();
        true
    }

    /// Jump the current roll straight to settled, e.g. when the page is
    /// backgrounded mid-spin. A no-op outside a roll.
    pub fn settle_now(&mut self) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        if self.clock.force_settle() {
            events.push(SceneEvent::RollFinished);
        }
        events
    }

    /// Advance the scene by one frame delta and collect what happened
    pub fn update(&mut self, dt_ms: f32) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        self.refresh_layout();
        self.begin_exits();
        if self.clock.advance(dt_ms) {
            events.push(SceneEvent::RollFinished);
        }
        for motion in &mut self.motions {
            motion.position.advance(dt_ms);
            motion.scale.advance(dt_ms);
        }
        self.finish_exits(&mut events);
        events
    }

    #[inline]
    pub fn phase(&self) -> RollPhase {
        self.clock.phase()
    }

    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.clock.is_rolling()
    }

    #[inline]
    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    /// Results of the latest roll, if any roll has been triggered
    #[inline]
    pub fn outcome(&self) -> Option<&RollOutcome> {
        self.outcome.as_ref()
    }

    /// Recompute the grid over live dice and point their glides at the new
    /// slots. Exiting dice keep the slot they had; new dice get a motion.
    fn refresh_layout(&mut self) {
        if !self.layout_dirty {
            return;
        }
        self.layout_dirty = false;
        let frame = compute_layout(self.container, self.tray.live_count());
        let live = self.tray.iter().filter(|d| !d.pending_removal);
        for (die, slot) in live.zip(frame.positions.iter().copied()) {
            match self.motions.iter_mut().find(|m| m.die_id == die.id) {
                Some(motion) => {
                    motion.position.retarget(slot);
                    motion.scale.retarget(frame.scale);
                }
                None => self.motions.push(DieMotion::enter(die.id, slot, frame.scale)),
            }
        }
        self.layout = frame;
    }

    /// Point every exiting die's scale at zero. Retargeting is idempotent,
    /// so shrinks already in flight keep their progress.
    fn begin_exits(&mut self) {
        for die in self.tray.iter().filter(|d| d.pending_removal) {
            if let Some(motion) = self.motions.iter_mut().find(|m| m.die_id == die.id) {
                motion.scale.retarget(0.0);
            }
        }
    }

    /// Drop exiting dice whose shrink has completed. Dice marked before
    /// they ever had a slot have nothing to shrink and leave at once.
    fn finish_exits(&mut self, events: &mut Vec<SceneEvent>) {
        let mut removed = Vec::new();
        for die in self.tray.iter().filter(|d| d.pending_removal) {
            let gone = match self.motions.iter().find(|m| m.die_id == die.id) {
                Some(motion) => motion.scale.is_settled() && motion.scale.target() == 0.0,
                None => true,
            };
            if gone {
                removed.push(die.id);
            }
        }
        for id in removed {
            self.tray.confirm_removed(id);
            self.motions.retain(|m| m.die_id != id);
            events.push(SceneEvent::DieRemoved(id));
        }
    }

    /// Draw instructions for every die, in tray order
    pub fn render(&self) -> Vec<DieInstruction> {
        let show_labels = self.clock.phase() == RollPhase::Settled;
        self.tray
            .iter()
            .map(|die| {
                let (position, scale) = self
                    .motions
                    .iter()
                    .find(|m| m.die_id == die.id)
                    .map(|m| (m.position.value(), m.scale.value()))
                    .unwrap_or((Vec2::ZERO, 0.0));
                let rotation = match self.style {
                    DiceStyle::Spinning => Some(self.clock.rotation(die.faces.rest_rotation())),
                    DiceStyle::Flat => None,
                };
                DieInstruction {
                    id: die.id,
                    faces: die.faces,
                    position,
                    scale,
                    rotation,
                    result_label: if show_labels { die.result } else { None },
                    visible: scale > consts::MIN_VISIBLE_SCALE,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds back a fixed script of faces
    struct ScriptedRoller(Vec<u32>);

    impl DieRoller for ScriptedRoller {
        fn roll(&mut self, _faces: FaceCount) -> u32 {
            self.0.remove(0)
        }
    }

    fn scene_with_script(script: Vec<u32>) -> DiceScene {
        DiceScene::with_roller(Box::new(ScriptedRoller(script)))
    }

    #[test]
    fn test_new_die_grows_into_its_slot() {
        let mut scene = DiceScene::new(1);
        scene.set_container_size(Vec2::new(232.0, 232.0));
        scene.add_die(FaceCount::D6);

        scene.update(0.0);
        let entering = &scene.render()[0];
        assert_eq!(entering.scale, 0.0);
        assert!(!entering.visible);

        scene.update(consts::REFLOW_MS);
        let settled = &scene.render()[0];
        assert!((settled.scale - 200.0).abs() < 0.001);
        assert!((settled.position - Vec2::new(116.0, 116.0)).length() < 0.001);
        assert!(settled.visible);
    }

    #[test]
    fn test_render_preserves_tray_order() {
        let mut scene = DiceScene::new(1);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        let a = scene.add_die(FaceCount::D6);
        let b = scene.add_die(FaceCount::D20);
        let c = scene.add_die(FaceCount::D6);
        scene.update(0.0);

        let ids: Vec<u32> = scene.render().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_adding_a_die_glides_existing_dice() {
        let mut scene = DiceScene::new(1);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.add_die(FaceCount::D6);
        scene.add_die(FaceCount::D6);
        scene.update(0.0);
        scene.update(consts::REFLOW_MS);
        let before = scene.render()[0].position;
        assert!((before - Vec2::new(204.0, 300.0)).length() < 0.001);

        scene.add_die(FaceCount::D6);
        scene.update(0.0);
        // Redirect starts from the settled slot, no jump
        assert!((scene.render()[0].position - before).length() < 0.001);

        // The die glides toward its slot in the three-die grid
        let slot = compute_layout(Vec2::new(800.0, 600.0), 3).positions[0];
        assert!((slot - Vec2::new(254.0, 154.0)).length() < 0.001);

        scene.update(500.0);
        let mid = scene.render()[0].position;
        // Half the reflow time is 0.875 eased progress
        assert!((mid - before.lerp(slot, 0.875)).length() < 0.01);

        scene.update(500.0);
        let after = scene.render()[0].position;
        assert!((after - slot).length() < 0.001);
        assert!((scene.render()[0].scale - 276.0).abs() < 0.001);
    }

    #[test]
    fn test_removed_die_shrinks_then_leaves() {
        let mut scene = DiceScene::new(1);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        let first = scene.add_die(FaceCount::D6);
        let second = scene.add_die(FaceCount::D6);
        scene.update(0.0);
        scene.update(consts::REFLOW_MS);

        scene.remove_die(FaceCount::D6);
        assert!(scene.update(0.0).is_empty());
        assert_eq!(scene.tray().len(), 2);

        // Near the end of the shrink the die is still present but invisible
        scene.update(999.0);
        let frame = scene.render();
        assert_eq!(frame.len(), 2);
        let exiting = frame.iter().find(|i| i.id == second).unwrap();
        assert!(!exiting.visible);

        let events = scene.update(1.0);
        assert_eq!(events, vec![SceneEvent::DieRemoved(second)]);
        assert_eq!(scene.tray().len(), 1);
        assert_eq!(scene.render()[0].id, first);
    }

    #[test]
    fn test_remove_before_first_layout_leaves_immediately() {
        let mut scene = DiceScene::new(1);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        let id = scene.add_die(FaceCount::D6);
        scene.remove_die(FaceCount::D6);

        let events = scene.update(16.0);
        assert_eq!(events, vec![SceneEvent::DieRemoved(id)]);
        assert!(scene.tray().is_empty());
    }

    #[test]
    fn test_roll_flow_and_label_gating() {
        let mut scene = scene_with_script(vec![3, 1]);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.add_die(FaceCount::D4);
        scene.add_die(FaceCount::D4);
        scene.update(0.0);

        assert!(scene.roll());
        assert_eq!(scene.phase(), RollPhase::Pending);
        assert!(scene.render().iter().all(|i| i.result_label.is_none()));

        scene.update(consts::REFLOW_MS);
        assert_eq!(scene.phase(), RollPhase::Active);
        assert!(scene.render().iter().all(|i| i.result_label.is_none()));

        let events = scene.update(5_000.0);
        assert_eq!(events, vec![SceneEvent::RollFinished]);
        assert_eq!(scene.phase(), RollPhase::Settled);

        let labels: Vec<Option<u32>> = scene.render().iter().map(|i| i.result_label).collect();
        assert_eq!(labels, vec![Some(3), Some(1)]);

        let outcome = scene.outcome().unwrap();
        assert_eq!(outcome.results, vec![3, 1]);
        assert_eq!(outcome.total, 4);
        assert_eq!(outcome.aggregation, Aggregation::Sum);

        // Finish is delivered once, not on later frames
        assert!(scene.update(5_000.0).is_empty());
    }

    #[test]
    fn test_roll_with_nothing_live_is_refused() {
        let mut scene = DiceScene::new(1);
        assert!(!scene.roll());
        assert!(scene.outcome().is_none());

        scene.add_die(FaceCount::D6);
        scene.remove_die(FaceCount::D6);
        assert!(!scene.roll());
        assert_eq!(scene.phase(), RollPhase::Idle);
    }

    #[test]
    fn test_settle_now_fires_finish_exactly_once() {
        let mut scene = scene_with_script(vec![5]);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.add_die(FaceCount::D8);
        scene.update(0.0);

        assert!(scene.settle_now().is_empty());

        scene.roll();
        scene.update(500.0);
        assert_eq!(scene.settle_now(), vec![SceneEvent::RollFinished]);
        assert_eq!(scene.phase(), RollPhase::Settled);
        assert_eq!(scene.render()[0].result_label, Some(5));

        assert!(scene.settle_now().is_empty());
        assert!(scene.update(10_000.0).is_empty());
    }

    #[test]
    fn test_flat_style_suppresses_rotation() {
        let mut scene = scene_with_script(vec![2]);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.add_die(FaceCount::D10);
        scene.update(0.0);

        assert_eq!(
            scene.render()[0].rotation,
            Some(FaceCount::D10.rest_rotation())
        );

        scene.set_style(DiceStyle::Flat);
        assert_eq!(scene.render()[0].rotation, None);
        assert_eq!(DiceStyle::Flat.toggled(), DiceStyle::Spinning);
    }

    #[test]
    fn test_aggregation_applies_to_next_roll() {
        let mut scene = scene_with_script(vec![3, 1]);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.add_die(FaceCount::D4);
        scene.add_die(FaceCount::D4);
        scene.update(0.0);

        scene.set_aggregation(Aggregation::KeepHighest);
        scene.roll();
        let outcome = scene.outcome().unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.aggregation, Aggregation::KeepHighest);
    }

    #[test]
    fn test_unmeasured_container_recovers_on_resize() {
        let mut scene = DiceScene::new(1);
        for _ in 0..5 {
            scene.add_die(FaceCount::D6);
        }
        // Host has not reported a size yet, dice park at zero scale
        scene.update(0.0);
        assert!(scene.render().iter().all(|i| !i.visible));

        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.update(0.0);
        scene.update(consts::REFLOW_MS);

        let frame = scene.render();
        let scale = scene.layout().scale;
        assert!(scale > 0.0);
        for instruction in &frame {
            assert!(instruction.visible);
            assert!((instruction.scale - scale).abs() < 0.001);
            assert!(instruction.position.x > 0.0 && instruction.position.x < 800.0);
            assert!(instruction.position.y > 0.0 && instruction.position.y < 600.0);
        }
    }

    #[test]
    fn test_repeated_size_report_does_not_reflow() {
        let mut scene = DiceScene::new(1);
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.add_die(FaceCount::D6);
        scene.update(0.0);
        scene.update(consts::REFLOW_MS);
        let settled = scene.render()[0].position;

        // Same size again must not restart the glide
        scene.set_container_size(Vec2::new(800.0, 600.0));
        scene.update(100.0);
        assert_eq!(scene.render()[0].position, settled);
    }
}
