#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::*;

    fn clock_and_timers() -> (Arc<ManualClock>, Timers) {
        let clock = Arc::new(ManualClock::new());
        let timers = Timers::new(clock.clone());
        (clock, timers)
    }

    fn estimated(widgets: &[Widget], container: Size, size: Size) -> BoundsMap {
        widgets
            .iter()
            .map(|w| {
                let rect = nominal_rect(&w.position, container, size);
                (w.id.clone(), WidgetBounds::new(w.id.clone(), rect))
            })
            .collect()
    }

    fn bounds(id: &str, x: f32, y: f32, w: f32, h: f32) -> WidgetBounds {
        WidgetBounds::new(id, Rect::new(x, y, w, h))
    }

    // ── positioning ─────────────────────────────────────────────────────────

    #[test]
    fn test_anchor_coverage() {
        // top, right, bottom, left
        let expected = [
            (Anchor::TopLeft, [true, false, false, true]),
            (Anchor::TopCenter, [true, false, false, true]),
            (Anchor::TopRight, [true, true, false, false]),
            (Anchor::CenterLeft, [true, false, false, true]),
            (Anchor::Center, [true, false, false, true]),
            (Anchor::CenterRight, [true, true, false, false]),
            (Anchor::BottomLeft, [false, false, true, true]),
            (Anchor::BottomCenter, [false, false, true, true]),
            (Anchor::BottomRight, [false, true, true, false]),
        ];
        for (anchor, edges) in expected {
            let insets = resolve(&Position::anchor(anchor));
            let set = [
                insets.top.is_some(),
                insets.right.is_some(),
                insets.bottom.is_some(),
                insets.left.is_some(),
            ];
            assert_eq!(set, edges, "edges for {anchor}");
        }
    }

    #[test]
    fn test_right_and_bottom_offsets_move_inward() {
        let pos = Position::anchor(Anchor::BottomRight).with_offset(Offset::px(8.0, 12.0));
        let insets = resolve(&pos);
        assert_eq!(insets.right, Some(Length::px(8.0)));
        assert_eq!(insets.bottom, Some(Length::px(12.0)));

        let rect = nominal_rect(&pos, Size::new(200.0, 100.0), Size::new(32.0, 32.0));
        assert_eq!(rect, Rect::new(160.0, 56.0, 32.0, 32.0));
    }

    #[test]
    fn test_center_anchor_shifts_by_half() {
        let pos = Position::anchor(Anchor::Center).with_offset(Offset::px(0.0, -8.0));
        let insets = resolve(&pos);
        assert_eq!(insets.left, Some(Length::percent(50.0)));
        assert_eq!(insets.top.map(|l| l.to_string()).as_deref(), Some("calc(50% - 8px)"));
        assert_eq!(insets.shift_transform().as_deref(), Some("translate(-50%, -50%)"));

        let rect = nominal_rect(&pos, Size::new(200.0, 100.0), Size::new(40.0, 20.0));
        assert_eq!(rect, Rect::new(80.0, 32.0, 40.0, 20.0));
    }

    #[test]
    fn test_percent_offsets_resolve_against_container() {
        let pos = Position::anchor(Anchor::TopLeft).with_offset(Offset {
            x: Length::percent(10.0),
            y: Length::percent(50.0) + Length::px(-4.0),
        });
        let rect = nominal_rect(&pos, Size::new(300.0, 200.0), Size::new(10.0, 10.0));
        assert_eq!(rect, Rect::new(30.0, 96.0, 10.0, 10.0));
    }

    #[test]
    fn test_region_bands() {
        let container = Size::new(400.0, 300.0);
        let size = Size::new(32.0, 48.0);

        let top = resolve(&Position::region(Region::Top));
        assert_eq!(top.top, Some(Length::ZERO));
        assert_eq!(top.right, Some(Length::ZERO));
        assert_eq!(top.bottom, None);

        let bottom = Position::region(Region::Bottom).with_offset(Offset::px(0.0, 10.0));
        assert_eq!(
            nominal_rect(&bottom, container, size),
            Rect::new(0.0, 242.0, 400.0, 48.0)
        );

        let right = Position::region(Region::Right);
        assert_eq!(
            nominal_rect(&right, container, size),
            Rect::new(368.0, 0.0, 32.0, 300.0)
        );

        let overlay = resolve(&Position::region(Region::Overlay));
        assert_eq!(overlay.declarations().len(), 4);
    }

    #[test]
    fn test_absolute_passes_through() {
        let pos = Position::absolute(12.0, 34.0);
        let insets = resolve(&pos);
        assert_eq!(insets.left, Some(Length::px(12.0)));
        assert_eq!(insets.top, Some(Length::px(34.0)));
        assert_eq!(insets.right, None);
        assert_eq!(insets.bottom, None);
        assert_eq!(pos.with_offset(Offset::px(5.0, 5.0)), pos);
    }

    #[test]
    fn test_adjacent_anchors() {
        assert_eq!(
            Anchor::TopLeft.adjacent().as_slice(),
            &[Anchor::TopCenter, Anchor::CenterLeft, Anchor::Center]
        );
        assert_eq!(
            Anchor::TopRight.adjacent().as_slice(),
            &[Anchor::TopCenter, Anchor::CenterRight, Anchor::Center]
        );
        let around_center = Anchor::Center.adjacent();
        assert_eq!(around_center.len(), 8);
        assert!(!around_center.contains(&Anchor::Center));
        for anchor in Anchor::ALL {
            assert!(!anchor.adjacent().contains(&anchor));
        }
    }

    #[test]
    fn test_length_parse_and_display() {
        assert_eq!("12px".parse::<Length>().unwrap(), Length::px(12.0));
        assert_eq!("12".parse::<Length>().unwrap(), Length::px(12.0));
        assert_eq!("25%".parse::<Length>().unwrap(), Length::percent(25.0));
        assert_eq!(
            "calc(50% - 8px)".parse::<Length>().unwrap(),
            Length::percent(50.0) - Length::px(8.0)
        );
        assert!(matches!(
            "12pt".parse::<Length>(),
            Err(ConfigError::InvalidLength(s)) if s == "12pt"
        ));

        assert_eq!(Length::px(16.0).to_string(), "16px");
        assert_eq!(Length::percent(50.0).to_string(), "50%");
        assert_eq!((Length::percent(50.0) + Length::px(4.0)).to_string(), "calc(50% + 4px)");
        assert_eq!((-Length::ZERO).to_string(), "0px");
    }

    // ── collision detection ────────────────────────────────────────────────

    #[test]
    fn test_overlap_correctness() {
        let a = bounds("a", 0.0, 0.0, 10.0, 10.0);
        let b = bounds("b", 5.0, 5.0, 10.0, 10.0);
        assert!(bounds_overlap(&a, &b));
        assert_eq!(
            calculate_overlap(&a, &b),
            Overlap {
                x: 5.0,
                y: 5.0,
                area: 25.0
            }
        );

        let touching = bounds("c", 10.0, 0.0, 10.0, 10.0);
        assert!(!bounds_overlap(&a, &touching));
        assert_eq!(calculate_overlap(&a, &touching).area, 0.0);
    }

    #[test]
    fn test_overlap_symmetry() {
        let boxes: Vec<WidgetBounds> = (0..6)
            .flat_map(|i| {
                (0..6).map(move |j| {
                    let (i, j) = (i as f32, j as f32);
                    bounds("b", i * 7.0 - 5.0, j * 6.0 - 3.0, 10.0 + i, 12.0 - j)
                })
            })
            .collect();
        for a in &boxes {
            for b in &boxes {
                assert_eq!(bounds_overlap(a, b), bounds_overlap(b, a));
                assert_eq!(calculate_overlap(a, b), calculate_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_detect_collisions_reports_every_pair() {
        let widgets: Vec<Widget> = ["a", "b", "c", "far"]
            .iter()
            .map(|id| Widget::new(*id, Position::anchor(Anchor::TopLeft)))
            .collect();
        let mut map = BoundsMap::new();
        map.insert("a".into(), bounds("a", 0.0, 0.0, 20.0, 20.0));
        map.insert("b".into(), bounds("b", 10.0, 0.0, 20.0, 20.0));
        map.insert("c".into(), bounds("c", 5.0, 5.0, 20.0, 20.0));
        map.insert("far".into(), bounds("far", 100.0, 100.0, 20.0, 20.0));

        let collisions = detect_collisions(&widgets, &map);
        let pairs: Vec<(&str, &str)> = collisions
            .iter()
            .map(|c| (c.widget1_id.as_str(), c.widget2_id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("a", "c"), ("b", "c")]);
    }

    #[test]
    fn test_detect_collisions_skips_unmeasured() {
        let widgets = vec![
            Widget::new("a", Position::anchor(Anchor::TopLeft)),
            Widget::new("ghost", Position::anchor(Anchor::TopLeft)),
        ];
        let mut map = BoundsMap::new();
        map.insert("a".into(), bounds("a", 0.0, 0.0, 20.0, 20.0));
        assert!(detect_collisions(&widgets, &map).is_empty());
    }

    // ── collision resolution ───────────────────────────────────────────────

    #[test]
    fn test_priority_preservation() {
        let container = Size::new(320.0, 180.0);
        // low priority listed first so order alone can't explain the outcome
        let widgets = vec![
            Widget::new("low", Position::anchor(Anchor::BottomLeft)).priority(0),
            Widget::new("high", Position::anchor(Anchor::BottomLeft)).priority(10),
        ];
        let map = estimated(&widgets, container, DEFAULT_WIDGET_SIZE);

        let result = CollisionResolver::new().resolve(&widgets, &map, container);
        assert!(result.has_collisions);
        assert!(!result.adjusted_positions.contains_key("high"));
        assert_eq!(
            result.adjusted_positions["low"].anchor_point(),
            Some(Anchor::BottomCenter)
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let container = Size::new(200.0, 120.0);
        let widgets = vec![
            Widget::new("a", Position::anchor(Anchor::Center)).priority(2),
            Widget::new("b", Position::anchor(Anchor::Center)).priority(1),
            Widget::new("c", Position::anchor(Anchor::Center)),
            Widget::new("d", Position::anchor(Anchor::Center)),
        ];
        let map = estimated(&widgets, container, Size::new(48.0, 32.0));
        let resolver = CollisionResolver::new();

        let first = resolver.resolve(&widgets, &map, container);
        let second = resolver.resolve(&widgets, &map, container);
        assert_eq!(first, second);
        assert_eq!(first.adjusted_positions.len(), 3);
    }

    #[test]
    fn test_no_collisions_no_adjustments() {
        let container = Size::new(200.0, 120.0);
        let widgets = vec![
            Widget::new("a", Position::anchor(Anchor::TopLeft)),
            Widget::new("b", Position::anchor(Anchor::BottomRight)),
        ];
        let map = estimated(&widgets, container, DEFAULT_WIDGET_SIZE);
        let result = CollisionResolver::new().resolve(&widgets, &map, container);
        assert_eq!(result, CollisionResult::default());
    }

    #[test]
    fn test_fallback_termination_leaves_widget_in_place() {
        // every candidate still overlaps: widgets fill the whole container
        let container = Size::new(100.0, 100.0);
        let widgets = vec![
            Widget::new("big", Position::anchor(Anchor::TopLeft)).priority(1),
            Widget::new("also-big", Position::anchor(Anchor::TopLeft)),
        ];
        let map = estimated(&widgets, container, Size::new(100.0, 100.0));

        let result = CollisionResolver::new().resolve(&widgets, &map, container);
        assert!(result.has_collisions);
        assert_eq!(result.collisions.len(), 1);
        assert!(result.adjusted_positions.is_empty());
    }

    #[test]
    fn test_offset_ladder_after_adjacent_anchors() {
        let container = Size::new(200.0, 200.0);
        let size = Size::new(32.0, 32.0);
        let widgets = vec![
            Widget::new("tc", Position::absolute(84.0, 0.0)).priority(10),
            Widget::new("cl", Position::absolute(0.0, 84.0)).priority(10),
            Widget::new("c", Position::absolute(84.0, 84.0)).priority(10),
            Widget::new("a", Position::anchor(Anchor::TopLeft)).priority(5),
            Widget::new("b", Position::anchor(Anchor::TopLeft)),
        ];
        let map = estimated(&widgets, container, size);

        let result = CollisionResolver::with_offset_ladder([40.0]).resolve(&widgets, &map, container);
        assert_eq!(result.adjusted_positions.len(), 1);
        assert_eq!(
            result.adjusted_positions["b"],
            Position::Anchor {
                anchor: Anchor::TopLeft,
                offset: Offset::px(40.0, 40.0),
                order: None,
            }
        );
    }

    #[test]
    fn test_region_and_absolute_widgets_are_never_adjusted() {
        let container = Size::new(200.0, 100.0);
        let widgets = vec![
            Widget::new("anchored", Position::anchor(Anchor::TopLeft)).priority(9),
            Widget::new("abs", Position::absolute(0.0, 0.0)),
            Widget::new("toolbar", Position::region(Region::Top)),
        ];
        let map = estimated(&widgets, container, DEFAULT_WIDGET_SIZE);

        let result = CollisionResolver::new().resolve(&widgets, &map, container);
        assert!(result.has_collisions);
        assert!(result.adjusted_positions.is_empty());
    }

    #[test]
    fn test_absolute_widgets_block_anchor_candidates() {
        let container = Size::new(200.0, 100.0);
        let widgets = vec![
            Widget::new("abs", Position::absolute(84.0, 0.0)).priority(5),
            Widget::new("first", Position::anchor(Anchor::TopLeft)).priority(1),
            Widget::new("second", Position::anchor(Anchor::TopLeft)),
        ];
        let map = estimated(&widgets, container, DEFAULT_WIDGET_SIZE);

        let result = CollisionResolver::new().resolve(&widgets, &map, container);
        // top-center is taken by the absolute widget, so center-left is next
        assert_eq!(
            result.adjusted_positions["second"].anchor_point(),
            Some(Anchor::CenterLeft)
        );
    }

    #[test]
    fn test_three_widgets_stacked_top_right() {
        let container = Size::new(640.0, 360.0);
        let widgets = vec![
            Widget::new("w1", Position::anchor(Anchor::TopRight)).priority(5),
            Widget::new("w2", Position::anchor(Anchor::TopRight)).priority(3),
            Widget::new("w3", Position::anchor(Anchor::TopRight)).priority(1),
        ];
        let map = estimated(&widgets, container, DEFAULT_WIDGET_SIZE);

        let result = CollisionResolver::new().resolve(&widgets, &map, container);
        assert!(result.has_collisions);
        assert_eq!(result.collisions.len(), 3);
        assert!(!result.adjusted_positions.contains_key("w1"));

        let p2 = result.adjusted_positions["w2"];
        let p3 = result.adjusted_positions["w3"];
        assert_eq!(p2.anchor_point(), Some(Anchor::TopCenter));
        assert_eq!(p3.anchor_point(), Some(Anchor::CenterRight));

        let r1 = map["w1"].rect;
        let r2 = nominal_rect(&p2, container, DEFAULT_WIDGET_SIZE);
        let r3 = nominal_rect(&p3, container, DEFAULT_WIDGET_SIZE);
        assert!(!r1.overlaps(&r2) && !r1.overlaps(&r3) && !r2.overlaps(&r3));
    }

    #[test]
    fn test_invalid_ladder_steps_are_dropped() {
        let resolver = CollisionResolver::with_offset_ladder([8.0, -4.0, f32::NAN, 0.0, 24.0]);
        assert_eq!(resolver.offset_ladder(), &[8.0, 24.0]);
        assert_eq!(CollisionResolver::new().offset_ladder(), &DEFAULT_OFFSET_LADDER);
    }

    // ── visibility ─────────────────────────────────────────────────────────

    #[test]
    fn test_should_show_named_triggers() {
        let idle = InteractionState::new();
        let cases = [
            (NamedTrigger::Hover, Interaction::HOVERED),
            (NamedTrigger::HoverContainer, Interaction::CONTAINER_HOVERED),
            (NamedTrigger::HoverSibling, Interaction::SIBLING_HOVERED),
            (NamedTrigger::Focus, Interaction::FOCUSED),
            (NamedTrigger::Active, Interaction::ACTIVE),
        ];
        for (named, flag) in cases {
            let trigger = Trigger::named(named);
            assert!(!should_show(&trigger, &idle), "{named:?} idle");
            assert!(should_show(&trigger, &InteractionState::new().with(flag)));
            // other flags don't leak
            let others = InteractionState {
                flags: Interaction::all() - flag,
                ..InteractionState::default()
            };
            assert!(!should_show(&trigger, &others), "{named:?} with others");
        }
        assert!(should_show(&Trigger::ALWAYS, &idle));
    }

    #[test]
    fn test_visibility_fail_closed() {
        let empty = InteractionState::new();
        assert!(!should_show(&Trigger::condition("x"), &empty));

        let set = InteractionState::new().with_condition("x", true);
        assert!(should_show(&Trigger::condition("x"), &set));
        assert!(!should_show(
            &Trigger::condition("x"),
            &InteractionState::new().with_condition("x", false)
        ));

        let all = InteractionState {
            flags: Interaction::all(),
            ..set
        };
        assert!(!should_show(&Trigger::Unrecognized("on-hover".into()), &all));
    }

    #[test]
    fn test_touch_fallback_scenario() {
        let touch = HeadlessPlatform::touch_only();

        let hover = VisibilityConfig::with_trigger(Trigger::named(NamedTrigger::Hover));
        assert_eq!(adapt_for_touch(&hover, &touch).trigger, Trigger::ALWAYS);

        let container = VisibilityConfig::with_trigger(Trigger::named(NamedTrigger::HoverContainer));
        assert_eq!(adapt_for_touch(&container, &touch), container);

        let opted_in = VisibilityConfig {
            touch_fallback: Some(Trigger::ALWAYS),
            ..container.clone()
        };
        assert_eq!(adapt_for_touch(&opted_in, &touch).trigger, Trigger::ALWAYS);

        let explicit_hover = VisibilityConfig {
            touch_fallback: Some(Trigger::named(NamedTrigger::Focus)),
            ..hover.clone()
        };
        assert_eq!(
            adapt_for_touch(&explicit_hover, &touch).trigger,
            Trigger::named(NamedTrigger::Focus)
        );

        // a touch laptop still has a hovering pointer
        let hybrid = HeadlessPlatform::desktop();
        hybrid.set_touch(true, true);
        assert_eq!(adapt_for_touch(&hover, &hybrid), hover);
        assert_eq!(adapt_for_touch(&hover, &HeadlessPlatform::desktop()), hover);
    }

    #[test]
    fn test_transition_styles() {
        let fade = VisibilityConfig::default();
        let shown = transition_style(&fade, true, false);
        assert_eq!(shown.opacity, Some(1.0));
        assert_eq!(shown.pointer_events, Some(PointerEvents::Auto));
        assert_eq!(shown.transition.as_deref(), Some("opacity 200ms ease-out"));
        let hidden = transition_style(&fade, false, false);
        assert_eq!(hidden.opacity, Some(0.0));
        assert!(!hidden.display_none);

        let slide = VisibilityConfig {
            transition: Transition::Slide,
            transition_duration: 120,
            easing: Easing::Linear,
            ..VisibilityConfig::default()
        };
        let hidden = transition_style(&slide, false, false);
        assert_eq!(hidden.transform, Some(MotionTransform::TranslateY(8.0)));
        assert_eq!(
            hidden.transition.as_deref(),
            Some("opacity 120ms linear, transform 120ms linear")
        );

        let scale = VisibilityConfig {
            transition: Transition::Scale,
            ..VisibilityConfig::default()
        };
        assert_eq!(
            transition_style(&scale, true, false).transform,
            Some(MotionTransform::Scale(1.0))
        );

        let none = VisibilityConfig {
            transition: Transition::None,
            ..VisibilityConfig::default()
        };
        assert_eq!(transition_style(&none, true, false), TransitionStyle::default());
        assert!(transition_style(&none, false, false).display_none);
    }

    #[test]
    fn test_reduced_motion_disables_transitions() {
        let fade = VisibilityConfig::default();
        assert!(transition_style(&fade, false, true).display_none);
        assert_eq!(transition_style(&fade, true, true), TransitionStyle::default());

        let ignores_preference = VisibilityConfig {
            reduce_motion: false,
            ..fade
        };
        assert!(!transition_style(&ignores_preference, false, true).display_none);
    }

    #[test]
    fn test_hidden_widgets_never_accept_input() {
        for transition in [
            Transition::None,
            Transition::Fade,
            Transition::Slide,
            Transition::Scale,
        ] {
            let config = VisibilityConfig {
                transition,
                ..VisibilityConfig::default()
            };
            for reduced in [false, true] {
                assert!(!transition_style(&config, false, reduced).accepts_input());
                assert!(transition_style(&config, true, reduced).accepts_input());
            }
        }
    }

    // ── state machine ──────────────────────────────────────────────────────

    #[test]
    fn test_state_machine_delayed_show_and_hide() {
        let (clock, timers) = clock_and_timers();
        let m = VisibilityStateMachine::new(timers.clone(), Duration::from_millis(100));

        m.show();
        assert_eq!(m.state(), VisibilityState::PendingShow);
        assert!(!m.is_visible());

        clock.advance(Duration::from_millis(99));
        timers.run_due();
        assert_eq!(m.state(), VisibilityState::PendingShow);

        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.run_due(), 1);
        assert_eq!(m.state(), VisibilityState::Visible);

        m.hide();
        assert_eq!(m.state(), VisibilityState::PendingHide);
        assert!(m.is_visible());
        clock.advance(Duration::from_millis(100));
        timers.run_due();
        assert_eq!(m.state(), VisibilityState::Hidden);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_show_during_pending_hide_restarts_delay() {
        let (clock, timers) = clock_and_timers();
        let m = VisibilityStateMachine::with_initial(timers.clone(), Duration::from_millis(100), true);

        m.hide();
        assert_eq!(m.state(), VisibilityState::PendingHide);
        clock.advance(Duration::from_millis(60));
        m.show();
        assert_eq!(m.state(), VisibilityState::PendingShow);
        assert_eq!(timers.pending(), 1);

        // the cancelled hide deadline passes without effect
        clock.advance(Duration::from_millis(40));
        timers.run_due();
        assert_eq!(m.state(), VisibilityState::PendingShow);

        clock.advance(Duration::from_millis(60));
        timers.run_due();
        assert_eq!(m.state(), VisibilityState::Visible);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_hide_during_pending_show_restarts_delay() {
        let (clock, timers) = clock_and_timers();
        let m = VisibilityStateMachine::new(timers.clone(), Duration::from_millis(100));

        m.show();
        m.hide();
        assert_eq!(m.state(), VisibilityState::PendingHide);
        assert_eq!(timers.pending(), 1);

        clock.advance(Duration::from_millis(100));
        timers.run_due();
        assert_eq!(m.state(), VisibilityState::Hidden);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_state_machine_zero_delay_is_synchronous() {
        let (_clock, timers) = clock_and_timers();
        let m = VisibilityStateMachine::new(timers.clone(), Duration::ZERO);
        m.show();
        assert_eq!(m.state(), VisibilityState::Visible);
        m.hide();
        assert_eq!(m.state(), VisibilityState::Hidden);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_state_machine_notifies_subscribers() {
        let (clock, timers) = clock_and_timers();
        let m = VisibilityStateMachine::new(timers.clone(), Duration::from_millis(50));
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            m.subscribe(move |s| seen.borrow_mut().push(s));
        }

        m.show();
        clock.advance(Duration::from_millis(50));
        timers.run_due();
        m.hide_immediate();

        assert_eq!(
            *seen.borrow(),
            vec![
                VisibilityState::PendingShow,
                VisibilityState::Visible,
                VisibilityState::Hidden
            ]
        );
    }

    #[test]
    fn test_state_machine_destroy_is_idempotent() {
        let (clock, timers) = clock_and_timers();
        let m = VisibilityStateMachine::new(timers.clone(), Duration::from_millis(100));
        m.show();
        assert_eq!(timers.pending(), 1);

        m.destroy();
        m.destroy();
        assert_eq!(timers.pending(), 0);
        assert!(m.is_destroyed());

        m.show_immediate();
        assert_eq!(m.state(), VisibilityState::PendingShow);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timers.run_due(), 0);
    }

    #[test]
    fn test_state_machine_drop_cancels_timers() {
        let (_clock, timers) = clock_and_timers();
        {
            let m = VisibilityStateMachine::with_initial(
                timers.clone(),
                Duration::from_millis(100),
                true,
            );
            m.hide();
            assert_eq!(timers.pending(), 1);
        }
        assert_eq!(timers.pending(), 0);
    }

    // ── timers & platform ──────────────────────────────────────────────────

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let (clock, timers) = clock_and_timers();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (name, ms) in [("late", 30), ("early", 10), ("tie-a", 20), ("tie-b", 20)] {
            let log = log.clone();
            timers.schedule(Duration::from_millis(ms), move || log.borrow_mut().push(name));
        }
        let cancelled = {
            let log = log.clone();
            timers.schedule(Duration::from_millis(5), move || log.borrow_mut().push("cancelled"))
        };
        assert!(timers.cancel(cancelled));
        assert!(!timers.cancel(cancelled));

        clock.advance(Duration::from_millis(20));
        assert_eq!(timers.run_due(), 3);
        assert_eq!(*log.borrow(), vec!["early", "tie-a", "tie-b"]);
        assert_eq!(timers.next_deadline(), Some(timers.now() + Duration::from_millis(10)));

        clock.advance(Duration::from_millis(10));
        timers.run_due();
        assert_eq!(log.borrow().last(), Some(&"late"));
    }

    #[test]
    fn test_timers_scheduled_from_callback_wait_for_next_run() {
        let (_clock, timers) = clock_and_timers();
        let count = Rc::new(RefCell::new(0));
        {
            let timers2 = timers.clone();
            let count = count.clone();
            timers.schedule(Duration::ZERO, move || {
                *count.borrow_mut() += 1;
                let count = count.clone();
                timers2.schedule(Duration::ZERO, move || *count.borrow_mut() += 1);
            });
        }
        assert_eq!(timers.run_due(), 1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_headless_platform_reduced_motion_watch() {
        let platform = HeadlessPlatform::desktop();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let guard = {
            let seen = seen.clone();
            platform.watch_reduced_motion(Box::new(move |v: bool| seen.borrow_mut().push(v)))
        };
        assert_eq!(platform.listener_count(), 1);

        platform.set_reduced_motion(true);
        platform.set_reduced_motion(true);
        platform.set_reduced_motion(false);
        assert_eq!(*seen.borrow(), vec![true, false]);

        guard.run();
        guard.run();
        assert!(guard.is_disposed());
        assert_eq!(platform.listener_count(), 0);
        platform.set_reduced_motion(true);
        assert_eq!(seen.borrow().len(), 2);
        assert!(platform.prefers_reduced_motion());
    }

    // ── configuration ──────────────────────────────────────────────────────

    const CONFIG: &str = r#"{
        "widgets": [
            { "id": "live", "kind": "badge",
              "position": { "mode": "anchor", "anchor": "top-right", "offset": { "x": 8, "y": "8px" } },
              "priority": 5 },
            { "id": "scrubber",
              "position": { "mode": "region", "region": "bottom", "order": 1 },
              "visibility": { "trigger": "hover-container", "transition": "slide", "transitionDuration": 150 },
              "interactive": true, "handlesOwnInteraction": true },
            { "id": "paused",
              "position": { "mode": "absolute", "x": "50%", "y": 10 },
              "visibility": { "trigger": { "condition": "isPaused" } } }
        ],
        "collision": { "offsetLadder": [8, 16], "settle": { "strategy": "layout-commit" } }
    }"#;

    #[test]
    fn test_config_from_json() {
        let config = OverlayConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.widgets.len(), 3);

        let live = &config.widgets[0];
        assert_eq!(live.kind.as_deref(), Some("badge"));
        assert_eq!(
            live.position,
            Position::Anchor {
                anchor: Anchor::TopRight,
                offset: Offset::px(8.0, 8.0),
                order: None,
            }
        );
        assert_eq!(live.visibility, VisibilityConfig::default());

        let scrubber = &config.widgets[1];
        assert_eq!(scrubber.position.order(), Some(1));
        assert_eq!(
            scrubber.visibility.trigger,
            Trigger::named(NamedTrigger::HoverContainer)
        );
        assert_eq!(scrubber.visibility.transition, Transition::Slide);
        assert_eq!(scrubber.visibility.duration(), Duration::from_millis(150));
        assert!(scrubber.interactive && scrubber.handles_own_interaction);

        let paused = &config.widgets[2];
        assert_eq!(
            paused.position,
            Position::Absolute {
                x: Length::percent(50.0),
                y: Length::px(10.0)
            }
        );
        assert_eq!(paused.visibility.trigger, Trigger::condition("isPaused"));

        assert!(config.collision.enabled);
        assert_eq!(config.collision.offset_ladder, vec![8.0, 16.0]);
        assert_eq!(config.collision.settle, SettleStrategy::LayoutCommit);
        assert_eq!(config.collision.default_widget_size, DEFAULT_WIDGET_SIZE);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = OverlayConfig::from_json(CONFIG).unwrap();
        let json = config.to_json().unwrap();
        assert_eq!(OverlayConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_config_validation_errors() {
        let dup = r#"{ "widgets": [
            { "id": "a", "position": { "mode": "anchor", "anchor": "center" } },
            { "id": "a", "position": { "mode": "anchor", "anchor": "top-left" } } ] }"#;
        assert!(matches!(
            OverlayConfig::from_json(dup),
            Err(ConfigError::DuplicateWidgetId(id)) if id == "a"
        ));

        let empty = r#"{ "widgets": [
            { "id": "a", "position": { "mode": "anchor", "anchor": "center" },
              "visibility": { "trigger": { "condition": " " } } } ] }"#;
        assert!(matches!(
            OverlayConfig::from_json(empty),
            Err(ConfigError::EmptyCondition { widget }) if widget == "a"
        ));

        let ladder = r#"{ "collision": { "offsetLadder": [16, -1] } }"#;
        assert!(matches!(
            OverlayConfig::from_json(ladder),
            Err(ConfigError::InvalidOffsetStep(s)) if s == -1.0
        ));

        let size = r#"{ "widgets": [
            { "id": "a", "position": { "mode": "anchor", "anchor": "center" },
              "style": { "width": 0 } } ] }"#;
        assert!(matches!(
            OverlayConfig::from_json(size),
            Err(ConfigError::InvalidWidgetSize { .. })
        ));

        let length = r#"{ "widgets": [
            { "id": "a", "position": { "mode": "anchor", "anchor": "center", "offset": { "x": "12pt" } } } ] }"#;
        assert!(matches!(OverlayConfig::from_json(length), Err(ConfigError::Json(_))));

        let anchor = r#"{ "widgets": [
            { "id": "a", "position": { "mode": "anchor", "anchor": "middle" } } ] }"#;
        assert!(matches!(OverlayConfig::from_json(anchor), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_config_unrecognized_trigger_is_kept_and_hidden() {
        let json = r#"{ "widgets": [
            { "id": "a", "position": { "mode": "anchor", "anchor": "center" },
              "visibility": { "trigger": "on-hover" } } ] }"#;
        let config = OverlayConfig::from_json(json).unwrap();
        let trigger = &config.widgets[0].visibility.trigger;
        assert_eq!(trigger, &Trigger::Unrecognized("on-hover".into()));
        assert!(!should_show(trigger, &InteractionState::new()));
    }
}
