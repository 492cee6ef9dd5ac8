//! Orchestrates collection focus, viewpoint cycling, transitions and the search modal.
//!
//! Every input event is handled to completion before the next one; the only deferred work is the
//! search-modal opening, which waits for the camera to settle on the search viewpoint.

use crate::artwork::{ArtworkRecord, ItemView};
use crate::collection::CollectionStore;
use crate::config::{DisplayConfig, GalleryConfig, SettlePolicy};
use crate::error::NavigatorError;
use crate::events::{EventBus, NavigatorEvent};
use crate::mode::{Intent, Mode, ModeController};
use crate::pipeline::{self, SortKey};
use crate::render::{Footprint, ImageLoader, ImageReport, SceneRenderer};
use crate::source::ArtworkSource;
use crate::transition::TransitionEngine;
use crate::viewpoint::{Pose, ViewpointCycle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    OpenSearchOverlay,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    fire_at: Duration,
    action: DeferredAction,
}

/// All mutable session state, owned by exactly one navigator.
#[derive(Debug, Clone)]
pub struct NavigatorState {
    pub collection: CollectionStore,
    pub viewpoints: ViewpointCycle,
    pub transitions: TransitionEngine,
    pub modes: ModeController,
    pending: Vec<Deferred>,
    awaiting_image: Option<String>,
    instructions_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The modal was not open; nothing changed.
    Ignored,
    Applied { matches: usize },
    NoResults,
}

pub struct Navigator<R: SceneRenderer, L: ImageLoader> {
    state: NavigatorState,
    renderer: R,
    images: L,
    events: EventBus,
    settle_delay: Duration,
    settle_policy: SettlePolicy,
    display: DisplayConfig,
}

impl<R: SceneRenderer, L: ImageLoader> Navigator<R, L> {
    pub fn new(config: &GalleryConfig, renderer: R, images: L) -> Result<Self, NavigatorError> {
        let viewpoints = ViewpointCycle::new(config.poses(), config.search.viewpoint_index)?;
        let transitions =
            TransitionEngine::new(viewpoints.current(), config.transition.duration(), config.transition.easing.into());
        Ok(Self {
            state: NavigatorState {
                collection: CollectionStore::new(),
                viewpoints,
                transitions,
                modes: ModeController::new(),
                pending: Vec::new(),
                awaiting_image: None,
                instructions_visible: false,
            },
            renderer,
            images,
            events: EventBus::default(),
            settle_delay: config.search.settle_delay(),
            settle_policy: config.search.settle_policy,
            display: config.display.clone(),
        })
    }

    /// Loads the collection and presents the first item. On failure the navigator stays idle.
    pub fn start(&mut self, source: &mut dyn ArtworkSource) -> Result<(), NavigatorError> {
        let records = match source.load() {
            Ok(records) => records,
            Err(err) => {
                log::error!("[navigator] Collection load failed: {err:#}");
                return Err(NavigatorError::data_unavailable(&err));
            }
        };
        let count = records.len();
        if !self.state.collection.set_full(records) {
            return Ok(());
        }
        log::info!("[navigator] Loaded {count} artworks");
        self.events.push(NavigatorEvent::CollectionLoaded { count });
        self.renderer.set_look_enabled(false);
        self.renderer.set_camera_pose(self.state.viewpoints.current());
        self.renderer.set_instructions_visible(true);
        self.state.instructions_visible = true;
        log::info!("[navigator] {}", self.state.modes.mode().status_message());
        self.present_focus();
        Ok(())
    }

    /// Mode check, then dispatch. Returns whether the intent was applied.
    pub fn handle_intent(&mut self, intent: Intent, now: Duration) -> bool {
        if !self.state.collection.is_loaded() {
            log::debug!("[navigator] {intent:?} dropped: no collection loaded");
            return false;
        }
        if !self.state.modes.permits(&intent) {
            log::debug!("[navigator] {intent:?} dropped in {} mode", self.state.modes.mode());
            return false;
        }
        match intent {
            Intent::Viewpoint(step) => {
                let target = self.state.viewpoints.advance(step);
                self.move_camera(target, now);
            }
            Intent::Item(step) => {
                if self.state.collection.advance_focus(step).is_some() {
                    self.present_focus();
                }
            }
            Intent::ToggleLook => self.toggle_look(),
            Intent::OpenSearch => self.begin_search(now),
            Intent::Look { yaw_degrees, pitch_degrees } => {
                let pose = self.state.transitions.apply_look(yaw_degrees, pitch_degrees, now);
                self.renderer.set_camera_pose(pose);
            }
            Intent::DismissInstructions => return self.dismiss_instructions(),
        }
        true
    }

    /// Modal submission: filter + sort the full collection and return to guided navigation.
    pub fn submit_search(&mut self, term: &str, sort_key: SortKey) -> SearchOutcome {
        let from = self.state.modes.mode();
        if !self.state.modes.close_search_modal() {
            log::debug!("[navigator] search submission ignored in {from} mode");
            return SearchOutcome::Ignored;
        }
        self.renderer.set_search_overlay(false);
        self.note_mode_change(from);

        let displayed = pipeline::apply(self.state.collection.full(), term, sort_key);
        let matches = displayed.len();
        self.state.collection.replace_displayed(displayed);
        self.present_focus();

        let term = term.trim().to_string();
        if matches == 0 {
            log::warn!("[navigator] {}", NavigatorError::EmptyResult { term: term.clone() });
            self.events.push(NavigatorEvent::NoResults { term });
            SearchOutcome::NoResults
        } else {
            log::info!("[navigator] search '{term}' sorted by {sort_key} matched {matches}");
            self.events.push(NavigatorEvent::SearchApplied { term, matches });
            SearchOutcome::Applied { matches }
        }
    }

    /// Per-frame driver: fires due deferred actions, applies image reports, advances transitions.
    /// Returns whether further ticks have work to do.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.state.collection.is_loaded() {
            return false;
        }
        self.fire_deferred(now);
        for report in self.images.drain_reports() {
            self.handle_image_report(report);
        }
        let animating = self.state.transitions.tick(now, &mut self.renderer);
        animating || !self.state.pending.is_empty()
    }

    pub fn image_loaded(&mut self, reference: &str, width: u32, height: u32) {
        self.handle_image_report(ImageReport { reference: reference.to_string(), outcome: Ok((width, height)) });
    }

    pub fn image_failed(&mut self, reference: &str, reason: &str) {
        self.handle_image_report(ImageReport { reference: reference.to_string(), outcome: Err(reason.to_string()) });
    }

    pub fn handle_image_report(&mut self, report: ImageReport) {
        if self.state.awaiting_image.as_deref() != Some(report.reference.as_str()) {
            log::debug!("[navigator] stale image report for {}", report.reference);
            return;
        }
        self.state.awaiting_image = None;
        let failure = match report.outcome {
            Ok((width, height)) => {
                match Footprint::fit(width, height, self.display.max_width, self.display.max_height) {
                    Some(footprint) => {
                        self.renderer.show_image(&report.reference, footprint);
                        return;
                    }
                    None => format!("degenerate dimensions {width}x{height}"),
                }
            }
            Err(reason) => reason,
        };
        let err = NavigatorError::ImageLoadFailure { reference: report.reference.clone(), reason: failure.clone() };
        log::warn!("[navigator] {err}");
        self.events.push(NavigatorEvent::ImageLoadFailed { reference: report.reference, reason: failure });
    }

    pub fn mode(&self) -> Mode {
        self.state.modes.mode()
    }

    pub fn current_item(&self) -> Option<&ArtworkRecord> {
        self.state.collection.current_item()
    }

    pub fn current_pose(&self, now: Duration) -> Pose {
        self.state.transitions.live_pose(now)
    }

    pub fn viewpoint_index(&self) -> usize {
        self.state.viewpoints.current_index()
    }

    pub fn displayed(&self) -> &[ArtworkRecord] {
        self.state.collection.displayed()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.collection.is_loaded()
    }

    pub fn instructions_visible(&self) -> bool {
        self.state.instructions_visible
    }

    pub fn has_pending_search_overlay(&self) -> bool {
        self.state.pending.iter().any(|d| d.action == DeferredAction::OpenSearchOverlay)
    }

    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn images(&self) -> &L {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut L {
        &mut self.images
    }

    pub fn drain_events(&mut self) -> Vec<NavigatorEvent> {
        self.events.drain()
    }

    fn move_camera(&mut self, target: Pose, now: Duration) {
        self.state.transitions.start(target, now);
        self.events.push(NavigatorEvent::ViewpointChanged { index: self.state.viewpoints.current_index() });
    }

    /// Hides the instructions panel the first time; later dismissals change nothing.
    fn dismiss_instructions(&mut self) -> bool {
        if !self.state.instructions_visible {
            return false;
        }
        self.state.instructions_visible = false;
        self.renderer.set_instructions_visible(false);
        self.events.push(NavigatorEvent::InstructionsDismissed);
        true
    }

    fn toggle_look(&mut self) {
        let from = self.state.modes.mode();
        if let Some(to) = self.state.modes.toggle_look() {
            self.renderer.set_look_enabled(to == Mode::FreeLook);
            self.note_mode_change(from);
        }
    }

    fn begin_search(&mut self, now: Duration) {
        let index = self.state.viewpoints.search_index();
        match self.state.viewpoints.jump_to(index) {
            Ok(target) => self.move_camera(target, now),
            Err(err) => {
                log::error!("[navigator] search viewpoint unavailable: {err}");
                return;
            }
        }
        self.state
            .pending
            .push(Deferred { fire_at: now + self.settle_delay, action: DeferredAction::OpenSearchOverlay });
    }

    fn fire_deferred(&mut self, now: Duration) {
        if self.state.pending.is_empty() {
            return;
        }
        let (due, waiting): (Vec<Deferred>, Vec<Deferred>) =
            self.state.pending.drain(..).partition(|deferred| deferred.fire_at <= now);
        self.state.pending = waiting;
        for deferred in due {
            match deferred.action {
                DeferredAction::OpenSearchOverlay => self.open_search_overlay(),
            }
        }
    }

    fn open_search_overlay(&mut self) {
        let from = self.state.modes.mode();
        if !self.state.modes.open_search_modal() {
            log::debug!("[navigator] search overlay already open");
            return;
        }
        if from == Mode::FreeLook {
            self.renderer.set_look_enabled(false);
        }
        self.renderer.set_search_overlay(true);
        self.note_mode_change(from);
        self.events.push(NavigatorEvent::SearchOverlayOpened);
    }

    fn note_mode_change(&mut self, from: Mode) {
        let to = self.state.modes.mode();
        if from == to {
            return;
        }
        log::info!("[navigator] {from} -> {to}: {}", to.status_message());
        self.events.push(NavigatorEvent::ModeChanged { from, to });
        if self.settle_policy == SettlePolicy::CancelOnModeChange && to != Mode::SearchModal {
            self.state.pending.retain(|d| d.action != DeferredAction::OpenSearchOverlay);
        }
    }

    fn present_focus(&mut self) {
        let collection = &self.state.collection;
        let index = collection.focus_index();
        match collection.current_item() {
            Some(record) => {
                let view = ItemView::from(record);
                self.renderer.show_item(&view);
                self.images.request(&view.image_reference);
                self.state.awaiting_image = Some(view.image_reference);
                self.events.push(NavigatorEvent::FocusChanged { id: Some(view.id), index });
            }
            None => {
                self.renderer.clear_item();
                self.state.awaiting_image = None;
                self.events.push(NavigatorEvent::FocusChanged { id: None, index: None });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ManualImageLoader, RecordingRenderer, RenderCommand};
    use crate::source::StaticSource;
    use crate::Step;

    type TestNavigator = Navigator<RecordingRenderer, ManualImageLoader>;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn records() -> Vec<ArtworkRecord> {
        vec![
            ArtworkRecord::new(0, "Starry Night", "Van Gogh", Some("18531890".into()), "starry.jpg"),
            ArtworkRecord::new(1, "The Scream", "Munch", None, "scream.jpg"),
            ArtworkRecord::new(2, "Nighthawks", "Hopper", Some("1942".into()), "nighthawks.jpg"),
        ]
    }

    fn navigator() -> TestNavigator {
        let mut nav = Navigator::new(&GalleryConfig::default(), RecordingRenderer::default(), ManualImageLoader::default())
            .expect("navigator");
        nav.start(&mut StaticSource::new(records())).expect("start");
        nav
    }

    #[test]
    fn start_presents_first_item_and_requests_image() {
        let mut nav = navigator();
        assert_eq!(nav.mode(), Mode::Guided);
        assert_eq!(nav.current_item().map(|r| r.title.as_str()), Some("Starry Night"));
        let shown = nav.renderer().shown_item().expect("item shown");
        assert_eq!(shown.artist_line, "by Van Gogh (1853\u{2013}1890)");
        assert_eq!(nav.images().requested(), ["starry.jpg".to_string()]);
        let events = nav.drain_events();
        assert_eq!(events[0], NavigatorEvent::CollectionLoaded { count: 3 });
    }

    #[test]
    fn image_reports_size_the_plane_and_ignore_stale_ones() {
        let mut nav = navigator();
        nav.handle_intent(Intent::Item(Step::Forward), ms(0));
        nav.renderer_mut().clear();

        nav.images_mut().resolve("starry.jpg", 800, 600);
        nav.images_mut().resolve("scream.jpg", 600, 900);
        nav.tick(ms(16));

        let shown: Vec<_> = nav
            .renderer()
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                RenderCommand::ShowImage { reference, footprint } => Some((reference.clone(), *footprint)),
                _ => None,
            })
            .collect();
        assert_eq!(shown.len(), 1, "stale report for the previous item is dropped");
        assert_eq!(shown[0].0, "scream.jpg");
        assert_eq!(shown[0].1, Footprint { width: 2.0, height: 3.0 });
    }

    #[test]
    fn image_failure_keeps_caption_and_notifies() {
        let mut nav = navigator();
        nav.drain_events();
        nav.image_failed("starry.jpg", "404");
        assert_eq!(nav.renderer().shown_item().map(|i| i.title.as_str()), Some("Starry Night"));
        assert_eq!(
            nav.drain_events(),
            vec![NavigatorEvent::ImageLoadFailed { reference: "starry.jpg".into(), reason: "404".into() }]
        );
    }

    #[test]
    fn loader_failures_are_drained_on_tick() {
        let mut nav = navigator();
        nav.drain_events();
        nav.images_mut().fail("starry.jpg", "connection reset");
        nav.tick(ms(16));
        assert_eq!(
            nav.drain_events(),
            vec![NavigatorEvent::ImageLoadFailed { reference: "starry.jpg".into(), reason: "connection reset".into() }]
        );
        assert!(nav.renderer().commands().iter().all(|cmd| !matches!(cmd, RenderCommand::ShowImage { .. })));
        assert_eq!(nav.renderer().shown_item().map(|i| i.title.as_str()), Some("Starry Night"));
    }

    #[test]
    fn instructions_show_on_start_and_hide_once() {
        let mut nav = navigator();
        assert!(nav.instructions_visible());
        assert!(nav.renderer().instructions_visible());
        nav.drain_events();

        assert!(nav.handle_intent(Intent::DismissInstructions, ms(0)));
        assert!(!nav.handle_intent(Intent::DismissInstructions, ms(10)));
        assert!(!nav.instructions_visible());
        assert!(!nav.renderer().instructions_visible());
        assert_eq!(nav.renderer().count(&RenderCommand::SetInstructionsVisible(false)), 1);
        assert_eq!(nav.drain_events(), vec![NavigatorEvent::InstructionsDismissed]);
    }

    #[test]
    fn instructions_can_be_dismissed_from_any_mode() {
        let mut nav = navigator();
        nav.handle_intent(Intent::OpenSearch, ms(0));
        nav.tick(ms(1000));
        assert_eq!(nav.mode(), Mode::SearchModal);
        assert!(nav.handle_intent(Intent::DismissInstructions, ms(1100)));
        assert_eq!(nav.mode(), Mode::SearchModal);
        assert!(!nav.renderer().instructions_visible());
    }

    #[test]
    fn zero_sized_images_count_as_failures() {
        let mut nav = navigator();
        nav.drain_events();
        nav.image_loaded("starry.jpg", 0, 0);
        assert!(matches!(nav.drain_events().as_slice(), [NavigatorEvent::ImageLoadFailed { .. }]));
    }

    #[test]
    fn viewpoint_steps_start_transitions() {
        let mut nav = navigator();
        assert!(nav.handle_intent(Intent::Viewpoint(Step::Backward), ms(0)));
        assert_eq!(nav.viewpoint_index(), 9);
        assert!(nav.state().transitions.is_animating());
        nav.tick(ms(1000));
        assert!(nav.current_pose(ms(1000)).approx_eq(&GalleryConfig::default().poses()[9], 1e-5));
    }

    #[test]
    fn free_look_blocks_discrete_navigation() {
        let mut nav = navigator();
        assert!(nav.handle_intent(Intent::ToggleLook, ms(0)));
        assert_eq!(nav.mode(), Mode::FreeLook);
        assert!(nav.renderer().commands().contains(&RenderCommand::SetLookEnabled(true)));
        assert!(!nav.handle_intent(Intent::Item(Step::Forward), ms(0)));
        assert!(!nav.handle_intent(Intent::OpenSearch, ms(0)));
        assert_eq!(nav.state().collection.focus_index(), Some(0));
        assert!(nav.handle_intent(Intent::Look { yaw_degrees: 10.0, pitch_degrees: 0.0 }, ms(0)));
        assert_eq!(nav.current_pose(ms(0)).rotation.y, 10.0);
        assert!(nav.handle_intent(Intent::ToggleLook, ms(0)));
        assert_eq!(nav.mode(), Mode::Guided);
    }

    #[test]
    fn failed_load_leaves_navigator_idle() {
        let mut nav: TestNavigator =
            Navigator::new(&GalleryConfig::default(), RecordingRenderer::default(), ManualImageLoader::default())
                .expect("navigator");
        let err = nav.start(&mut StaticSource::failing("backend unreachable")).unwrap_err();
        assert!(matches!(err, NavigatorError::DataUnavailable { .. }));
        assert!(!nav.is_loaded());
        assert!(!nav.handle_intent(Intent::OpenSearch, ms(0)));
        assert!(!nav.handle_intent(Intent::ToggleLook, ms(0)));
        assert!(!nav.tick(ms(5000)));
        assert_eq!(nav.mode(), Mode::Guided);
        assert!(nav.renderer().commands().is_empty());
    }

    #[test]
    fn cancel_policy_drops_pending_overlay_on_toggle() {
        let mut config = GalleryConfig::default();
        config.search.settle_policy = SettlePolicy::CancelOnModeChange;
        let mut nav = Navigator::new(&config, RecordingRenderer::default(), ManualImageLoader::default())
            .expect("navigator");
        nav.start(&mut StaticSource::new(records())).expect("start");

        nav.handle_intent(Intent::OpenSearch, ms(0));
        nav.handle_intent(Intent::ToggleLook, ms(200));
        assert!(!nav.has_pending_search_overlay());
        nav.tick(ms(1500));
        assert_eq!(nav.mode(), Mode::FreeLook);
    }

    #[test]
    fn default_policy_fires_overlay_even_after_toggle() {
        let mut nav = navigator();
        nav.handle_intent(Intent::OpenSearch, ms(0));
        nav.handle_intent(Intent::ToggleLook, ms(200));
        assert_eq!(nav.mode(), Mode::FreeLook);
        nav.tick(ms(1000));
        assert_eq!(nav.mode(), Mode::SearchModal);
        assert!(nav.renderer().commands().contains(&RenderCommand::SetLookEnabled(false)));
        assert!(nav.renderer().overlay_visible());
    }

    #[test]
    fn submission_outside_modal_is_ignored() {
        let mut nav = navigator();
        assert_eq!(nav.submit_search("scream", SortKey::None), SearchOutcome::Ignored);
        assert_eq!(nav.displayed().len(), 3);
    }
}
