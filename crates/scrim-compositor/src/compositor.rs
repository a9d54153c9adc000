use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use scrim_core::{
    BoundsMap, CollisionResolver, CollisionResult, CollisionSettings, Dispose, InteractionState,
    Platform, Position, Rect, TimerId, Timers, VisibilityState, VisibilityStateMachine, Widget,
    WidgetBounds, adapt_for_touch, nominal_rect, should_show, transition_style,
};

use crate::events::{InteractionTracker, Key, OverlayEvent};
use crate::measure::Measure;
use crate::registry::WidgetRegistry;
use crate::style::RenderStyle;

pub type ClickHandler<D> = Box<dyn Fn(&str, Option<&D>)>;

/// One widget as it should be rendered this frame.
#[derive(Debug)]
pub struct WidgetFrame<'a, D> {
    /// The configured widget with any collision adjustment substituted.
    pub widget: Widget,
    pub style: RenderStyle,
    pub state: VisibilityState,
    /// Whether the wrapper should route clicks and Enter/Space to the compositor.
    pub interactive: bool,
    pub data: Option<&'a D>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PassState {
    Idle,
    Timer(TimerId),
    AwaitingLayout,
}

/// Owns the widgets of one overlay surface: their visibility machines,
/// interaction state, collision adjustments and click dispatch.
///
/// Nothing runs on its own. The host forwards events through
/// [`handle_event`](Self::handle_event), drives time with
/// [`tick`](Self::tick), reports layout with
/// [`layout_committed`](Self::layout_committed) and reads [`frame`](Self::frame)
/// to render.
pub struct OverlayCompositor<D = serde_json::Value> {
    registry: Rc<WidgetRegistry>,
    platform: Rc<dyn Platform>,
    timers: Timers,
    settings: CollisionSettings,
    resolver: CollisionResolver,

    widgets: Vec<Widget>,
    data: HashMap<String, D>,
    machines: HashMap<String, VisibilityStateMachine>,
    tracker: InteractionTracker,

    // replaced wholesale on every pass
    adjusted: Rc<HashMap<String, Position>>,
    last_pass: Option<CollisionResult>,
    pass: PassState,
    pass_due: Rc<Cell<bool>>,

    reduced_motion: Rc<Cell<bool>>,
    motion_watch: Dispose,
    on_click: Option<ClickHandler<D>>,
    destroyed: bool,
}

impl<D> OverlayCompositor<D> {
    pub fn new(
        registry: Rc<WidgetRegistry>,
        platform: Rc<dyn Platform>,
        timers: Timers,
        settings: CollisionSettings,
    ) -> Self {
        let reduced_motion = Rc::new(Cell::new(platform.prefers_reduced_motion()));
        let motion_watch = {
            let cell = reduced_motion.clone();
            platform.watch_reduced_motion(Box::new(move |reduce: bool| {
                log::debug!("compositor: prefers-reduced-motion={reduce}");
                cell.set(reduce);
            }))
        };

        Self {
            registry,
            platform,
            timers,
            resolver: settings.resolver(),
            settings,
            widgets: Vec::new(),
            data: HashMap::new(),
            machines: HashMap::new(),
            tracker: InteractionTracker::new(),
            adjusted: Rc::new(HashMap::new()),
            last_pass: None,
            pass: PassState::Idle,
            pass_due: Rc::new(Cell::new(false)),
            reduced_motion,
            motion_watch,
            on_click: None,
            destroyed: false,
        }
    }

    pub fn on_widget_click(&mut self, f: impl Fn(&str, Option<&D>) + 'static) {
        self.on_click = Some(Box::new(f));
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Replace the widget list. Machines are kept for surviving ids, created
    /// (settled, without delay) for new ones and destroyed for removed ones.
    /// Data and adjustments of removed ids are dropped, and so is the
    /// adjustment of a widget whose configured position changed.
    /// Schedules a collision pass.
    pub fn set_widgets(&mut self, widgets: Vec<Widget>) {
        if self.destroyed {
            return;
        }

        let live: HashMap<&str, &Position> =
            widgets.iter().map(|w| (w.id.as_str(), &w.position)).collect();
        let ids: HashSet<&str> = live.keys().copied().collect();
        self.machines.retain(|id, _| ids.contains(id.as_str()));
        self.tracker.retain_widgets(&ids);
        // data may be set ahead of the widget it belongs to
        for old in &self.widgets {
            if !ids.contains(old.id.as_str()) {
                self.data.remove(&old.id);
            }
        }

        let unchanged = |id: &str| {
            self.widgets
                .iter()
                .find(|w| w.id == id)
                .is_some_and(|old| live.get(id).is_some_and(|p| **p == old.position))
        };
        if self.adjusted.keys().any(|id| !unchanged(id.as_str())) {
            let kept = self
                .adjusted
                .iter()
                .filter(|(id, _)| unchanged(id.as_str()))
                .map(|(id, p)| (id.clone(), *p))
                .collect();
            self.adjusted = Rc::new(kept);
        }

        for w in &widgets {
            let delay = w.visibility.delay_duration();
            if let Some(m) = self.machines.get(&w.id) {
                m.set_delay(delay);
                continue;
            }
            let visible = self.wants_visible(w);
            let machine = VisibilityStateMachine::with_initial(self.timers.clone(), delay, visible);
            self.machines.insert(w.id.clone(), machine);
        }

        log::debug!("compositor: {} widgets", widgets.len());
        self.widgets = widgets;
        self.refresh_visibility();
        self.schedule_pass();
    }

    pub fn set_data(&mut self, id: impl Into<String>, data: D) {
        self.data.insert(id.into(), data);
    }

    pub fn remove_data(&mut self, id: &str) -> Option<D> {
        self.data.remove(id)
    }

    pub fn data(&self, id: &str) -> Option<&D> {
        self.data.get(id)
    }

    /// Turning detection off drops every adjustment at once; turning it on
    /// schedules a pass.
    pub fn set_collision_detection(&mut self, enabled: bool) {
        if self.destroyed || self.settings.enabled == enabled {
            return;
        }
        self.settings.enabled = enabled;
        if enabled {
            self.schedule_pass();
        } else {
            self.cancel_pass();
            self.adjusted = Rc::new(HashMap::new());
            self.last_pass = None;
        }
    }

    /// Apply an interaction event and re-evaluate every widget's trigger.
    /// Returns whether the interaction state changed.
    pub fn handle_event(&mut self, event: OverlayEvent) -> bool {
        if self.destroyed {
            return false;
        }
        log::trace!("compositor: {event:?}");
        if !self.tracker.apply(&event) {
            return false;
        }
        self.refresh_visibility();
        true
    }

    pub fn interaction_state(&self, id: &str) -> InteractionState {
        self.tracker.state_for(id)
    }

    pub fn visibility_state(&self, id: &str) -> Option<VisibilityState> {
        self.machines.get(id).map(|m| m.state())
    }

    /// Fire due timers, then run the collision pass if its settle delay has
    /// elapsed. Returns whether a pass ran.
    pub fn tick(&mut self, measure: &dyn Measure) -> bool {
        if self.destroyed {
            return false;
        }
        self.timers.run_due();
        if !self.pass_due.get() {
            return false;
        }
        self.run_collision_pass(measure).is_some()
    }

    /// The host has committed layout for the current widget list. Runs the
    /// outstanding pass, if any, without waiting for a settle delay.
    pub fn layout_committed(&mut self, measure: &dyn Measure) -> bool {
        if self.destroyed || !self.is_pass_pending() {
            return false;
        }
        self.run_collision_pass(measure).is_some()
    }

    pub fn is_pass_pending(&self) -> bool {
        self.pass != PassState::Idle || self.pass_due.get()
    }

    /// Measure, detect and resolve now. Clears any scheduled pass.
    ///
    /// Returns `None` when detection is disabled or the container has not
    /// been laid out. In the latter case previous adjustments are kept and
    /// the pass stays due, so the next `tick` or `layout_committed` retries.
    pub fn run_collision_pass(&mut self, measure: &dyn Measure) -> Option<&CollisionResult> {
        self.cancel_pass();
        if self.destroyed {
            return None;
        }
        if !self.settings.enabled {
            self.adjusted = Rc::new(HashMap::new());
            self.last_pass = None;
            return None;
        }
        let Some(container) = measure.container_rect() else {
            log::debug!("compositor: container not laid out, deferring collision pass");
            self.pass_due.set(true);
            return None;
        };

        let bounds = self.measure_bounds(measure, container);
        let result = self
            .resolver
            .resolve(&self.widgets, &bounds, container.size());
        log::debug!(
            "compositor: pass found {} collisions, adjusted {:?}",
            result.collisions.len(),
            result.adjusted_positions.keys().collect::<Vec<_>>()
        );

        self.adjusted = Rc::new(result.adjusted_positions.clone());
        self.last_pass = Some(result);
        self.last_pass.as_ref()
    }

    /// Result of the most recent pass.
    pub fn last_pass(&self) -> Option<&CollisionResult> {
        self.last_pass.as_ref()
    }

    pub fn adjusted_positions(&self) -> Rc<HashMap<String, Position>> {
        self.adjusted.clone()
    }

    pub fn effective_widget(&self, widget: &Widget) -> Widget {
        match self.adjusted.get(&widget.id) {
            Some(p) => widget.with_position(*p),
            None => widget.clone(),
        }
    }

    pub fn effective_widgets(&self) -> Vec<Widget> {
        self.widgets.iter().map(|w| self.effective_widget(w)).collect()
    }

    /// Render output for every widget, in configuration order.
    pub fn frame(&self) -> Vec<WidgetFrame<'_, D>> {
        let reduced = self.reduced_motion.get();
        self.widgets
            .iter()
            .map(|w| {
                let widget = self.effective_widget(w);
                let state = self
                    .visibility_state(&w.id)
                    .unwrap_or(VisibilityState::Hidden);
                let config = adapt_for_touch(&w.visibility, self.platform.as_ref());
                let motion = transition_style(&config, state.is_rendered(), reduced);
                WidgetFrame {
                    style: RenderStyle::new(&widget, motion),
                    state,
                    interactive: self.registry.accepts_generic_input(w),
                    data: self.data.get(&w.id),
                    widget,
                }
            })
            .collect()
    }

    /// Dispatch a click on widget `id`. Only visible widgets that are
    /// interactive and do not handle their own input are accepted.
    pub fn click(&self, id: &str) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(widget) = self.widgets.iter().find(|w| w.id == id) else {
            return false;
        };
        if !self.registry.accepts_generic_input(widget) {
            return false;
        }
        if !self.machines.get(id).is_some_and(|m| m.is_visible()) {
            log::trace!("compositor: ignoring click on hidden `{id}`");
            return false;
        }
        if let Some(handler) = &self.on_click {
            handler(id, self.data.get(id));
        }
        true
    }

    /// Enter and Space activate like a click.
    pub fn key_press(&self, id: &str, key: Key) -> bool {
        key.activates() && self.click(id)
    }

    /// Cancel the pending pass and every visibility timer, and stop watching
    /// the platform. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.cancel_pass();
        for m in self.machines.values() {
            m.destroy();
        }
        self.machines.clear();
        self.motion_watch.run();
        self.on_click = None;
        log::debug!("compositor: destroyed");
    }

    fn wants_visible(&self, widget: &Widget) -> bool {
        let config = adapt_for_touch(&widget.visibility, self.platform.as_ref());
        should_show(&config.trigger, &self.tracker.state_for(&widget.id))
    }

    fn refresh_visibility(&self) {
        for w in &self.widgets {
            let Some(machine) = self.machines.get(&w.id) else {
                continue;
            };
            if self.wants_visible(w) {
                machine.show();
            } else {
                machine.hide();
            }
        }
    }

    /// Measured rects where available, estimates otherwise. A widget that is
    /// currently adjusted is measured at its adjusted spot, so it is placed
    /// back at its nominal position with the measured size.
    fn measure_bounds(&self, measure: &dyn Measure, container: Rect) -> BoundsMap {
        let extent = container.size();
        self.widgets
            .iter()
            .map(|w| {
                let measured = measure
                    .widget_rect(&w.id)
                    .map(|r| r.translate(-container.x, -container.y));
                let rect = match measured {
                    Some(r) if !self.adjusted.contains_key(&w.id) => r,
                    Some(r) => nominal_rect(&w.position, extent, r.size()),
                    None => {
                        let size = self
                            .registry
                            .estimated_size(w, self.settings.default_widget_size);
                        nominal_rect(&w.position, extent, size)
                    }
                };
                (w.id.clone(), WidgetBounds::new(w.id.clone(), rect))
            })
            .collect()
    }

    fn schedule_pass(&mut self) {
        self.cancel_pass();
        if !self.settings.enabled {
            return;
        }
        self.pass = match self.settings.settle.delay() {
            Some(delay) => {
                let due = self.pass_due.clone();
                PassState::Timer(self.timers.schedule(delay, move || due.set(true)))
            }
            None => PassState::AwaitingLayout,
        };
    }

    fn cancel_pass(&mut self) {
        if let PassState::Timer(id) = std::mem::replace(&mut self.pass, PassState::Idle) {
            self.timers.cancel(id);
        }
        self.pass_due.set(false);
    }
}

impl<D> Drop for OverlayCompositor<D> {
    fn drop(&mut self) {
        self.destroy();
    }
}
