use crate::*;

use alloc::vec::Vec;

use clusterlist::{
    Align, ClusterListOptions, ClusterState, Error, Level, LogRecord, RenderSurface,
    TrackerConfig, VisibilityTracker,
};
use proptest::prelude::*;

fn records(n: usize) -> Vec<LogRecord> {
    (0..n)
        .map(|i| LogRecord::new(i as u64 * 1000, Level::Info, "ok"))
        .collect()
}

fn host(n: usize) -> HeadlessHost<Vec<LogRecord>> {
    let mut h = HeadlessHost::new(
        ClusterListOptions::default(),
        records(n),
        MemorySurface::with_uniform_rows(600, 20),
    );
    h.init(0);
    h
}

/// Ticks every 10ms over `[from, to]`.
fn run(h: &mut HeadlessHost<Vec<LogRecord>>, from: u64, to: u64) {
    let mut now = from;
    while now <= to {
        h.tick(now);
        now += 10;
    }
}

fn loaded(h: &HeadlessHost<Vec<LogRecord>>) -> Vec<usize> {
    h.list().loaded_clusters().collect()
}

fn visible(h: &HeadlessHost<Vec<LogRecord>>) -> Vec<usize> {
    h.list().visible_clusters().collect()
}

fn placeholder(s: &mut MemorySurface, cluster: usize, height: u32) -> NodeId {
    let node = RenderSurface::<LogRecord>::create_placeholder_node(s, cluster, height, "p");
    RenderSurface::<LogRecord>::append(s, node);
    node
}

#[test]
fn initial_render_of_ten_thousand_records() {
    let mut h = host(10_000);
    let s = h.surface();
    assert_eq!(s.slot_count(), 200);
    assert_eq!(s.node_count(), 200 + 100);
    assert_eq!(s.content_height(), 200 * 1000);
    for slot in 0..200 {
        assert_eq!(s.layout().height_of(slot), Some(1000));
    }
    assert_eq!(h.list().reference_height(), Some(1000));
    assert_eq!(visible(&h), [0]);
    assert_eq!(h.list().tracker().observed_count(), 200);

    run(&mut h, 10, 200);
    assert_eq!(loaded(&h), [0, 1]);
    assert_eq!(h.surface().ops().replaces, 0);
    assert!(h.list().diagnostics().contains("Loaded clusters: 2/200"));
}

#[test]
fn scrolling_loads_clusters_near_the_viewport_and_releases_the_rest() {
    let mut h = host(10_000);
    run(&mut h, 10, 200);

    assert_eq!(h.scroll_to(50_000, 1_000), 50_000);
    assert_eq!(visible(&h), [49, 50]);
    assert_eq!(h.surface().clusters_in_viewport(), [50]);
    h.tick(1_100);
    assert_eq!(loaded(&h), [0, 1]);
    h.tick(1_150);
    assert_eq!(loaded(&h), [0, 1, 49, 50]);
    assert_eq!(h.surface().node_count(), 200 + 4 * 50);
    assert_eq!(h.surface().content_height(), 200 * 1000);

    // Cluster 49 keeps only 5% of its height inside the buffered viewport.
    h.scroll_to(50_150, 1_200);
    assert_eq!(visible(&h), [50]);
    run(&mut h, 1_210, 1_400);
    assert_eq!(loaded(&h), [0, 1, 50]);
    assert_eq!(h.surface().node_count(), 200 + 3 * 50);

    let ops = h.surface().ops();
    run(&mut h, 1_410, 2_000);
    assert_eq!(h.surface().ops(), ops);
}

#[test]
fn scrolling_past_the_end_is_clamped() {
    let mut h = host(1000);
    assert_eq!(h.scroll_to(u64::MAX, 10), 20 * 1000 - 600);
    assert_eq!(visible(&h), [19]);
}

#[test]
fn jump_loads_target_scrolls_smoothly_and_resumes_tracking() {
    let mut h = host(10_000);
    run(&mut h, 10, 200);

    h.input_mut().set_text("5020");
    assert_eq!(h.submit_jump(1_000), Ok(true));
    assert!(!h.list().is_attached());
    assert_eq!(loaded(&h), [0, 1, 99, 100, 101]);

    run(&mut h, 1_010, 1_140);
    assert!(!h.is_animating());
    h.tick(1_150);
    assert!(h.is_animating());

    let mut last = 0;
    for now in (1_160..1_550).step_by(10) {
        let offset = h.tick(now).unwrap();
        assert!(offset >= last);
        last = offset;
    }
    assert_eq!(h.tick(1_550), Some(100_110));
    assert!(!h.is_animating());
    assert!(h.list().is_attached());
    assert!(!h.list().is_navigating());
    assert_eq!(visible(&h), [100]);

    let cluster = RenderSurface::<LogRecord>::find_node_for_cluster(h.surface(), 100).unwrap();
    let row = RenderSurface::<LogRecord>::find_row(h.surface(), &cluster, 20).unwrap();
    assert!(h.surface().is_highlighted(row));
    assert_eq!(h.surface().bounds(row), Some((100_400, 20)));

    run(&mut h, 1_560, 1_700);
    assert_eq!(loaded(&h), [0, 1, 100]);

    run(&mut h, 1_710, 4_200);
    assert_eq!(h.surface().highlighted().count(), 0);
    assert!(h.list().diagnostics().contains("Successfully jumped to row 5020"));
}

#[test]
fn user_scroll_during_a_jump_cancels_the_animation() {
    let mut h = host(10_000);
    h.jump_to(5_020, 0).unwrap();
    h.tick(150);
    assert!(h.tick(250).is_some_and(|o| o > 0 && o < 100_110));

    assert_eq!(h.scroll_to(3_000, 260), 3_000);
    assert!(!h.is_animating());
    assert!(h.list().is_navigating());
    assert!(!h.list().is_attached());

    h.tick(1_149);
    assert!(!h.list().is_attached());
    h.tick(1_150);
    assert!(h.list().is_attached());
    assert_eq!(visible(&h), [2, 3]);
    run(&mut h, 1_160, 1_300);
    assert_eq!(loaded(&h), [0, 1, 2, 3]);
}

#[test]
fn jump_to_a_row_already_in_view_settles_immediately() {
    let mut h = host(1000);
    h.jump_to(0, 0).unwrap();
    assert_eq!(h.tick(150), Some(0));
    assert!(h.list().is_attached());
    assert!(!h.list().is_navigating());
}

#[test]
fn invalid_navigation_input() {
    let mut h = host(10_000);

    h.input_mut().set_text("abc");
    assert_eq!(h.submit_jump(10), Ok(false));
    h.input_mut().set_text("");
    assert_eq!(h.submit_jump(10), Ok(false));
    assert_eq!(h.alert(), None);
    assert!(!h.list().is_navigating());

    h.input_mut().set_text("10000");
    assert_eq!(
        h.submit_jump(20),
        Err(Error::InvalidIndex {
            index: 10_000,
            count: 10_000
        })
    );
    assert_eq!(
        h.take_alert().as_deref(),
        Some("Invalid row index. Please enter a number between 0 and 9999")
    );

    h.input_mut().set_text("-1");
    assert_eq!(
        h.submit_jump(30),
        Err(Error::InvalidIndex {
            index: -1,
            count: 10_000
        })
    );
    assert!(h.list().is_attached());
    assert!(!h.list().is_navigating());
    assert_eq!(loaded(&h), [0, 1]);
}

#[test]
fn only_enter_submits_from_the_keyboard() {
    let mut h = host(1000);
    h.input_mut().set_text("120");
    assert_eq!(h.key_press("a", 0), Ok(false));
    assert!(!h.list().is_navigating());
    assert_eq!(h.key_press("Enter", 0), Ok(true));
    assert!(h.list().is_navigating());
}

#[test]
fn navigation_input_parses_leading_integers() {
    let mut input = NavigationInput::new();
    for (text, expected) in [
        ("42", Ok(42)),
        ("  7", Ok(7)),
        ("12abc", Ok(12)),
        ("3.9", Ok(3)),
        ("-5", Ok(-5)),
        ("+8", Ok(8)),
        ("", Err(InputError::Empty)),
        ("   ", Err(InputError::Empty)),
        ("abc", Err(InputError::NotANumber)),
        ("-", Err(InputError::NotANumber)),
        ("99999999999999999999999", Ok(i64::MAX)),
    ] {
        input.set_text(text);
        assert_eq!(input.parse(), expected, "{text:?}");
    }
    input.set_text("9");
    assert_eq!(input.click(), Some(9));
    assert_eq!(input.key("Enter"), Some(9));
    assert_eq!(input.key("Tab"), None);
}

#[test]
fn variable_row_heights_drive_reference_and_placeholders() {
    let surface = MemorySurface::new(600, |i| if i % 10 == 0 { 40 } else { 20 });
    let mut h = HeadlessHost::new(ClusterListOptions::default(), records(1023), surface);
    h.init(0);
    assert_eq!(h.list().reference_height(), Some(1100));
    assert_eq!(h.surface().layout().height_of(19), Some(1100));
    assert_eq!(h.surface().layout().height_of(20), Some(506));

    let before = h.surface().content_height();
    h.list_mut().materialize(20).unwrap();
    assert_eq!(h.surface().layout().height_of(20), Some(520));
    assert_eq!(h.surface().content_height(), before + 14);
}

#[test]
fn dispose_clears_the_container() {
    let mut h = host(1000);
    h.dispose(10);
    assert_eq!(h.surface().node_count(), 0);
    assert_eq!(h.surface().content_height(), 0);
    assert!(!h.list().tracker().is_connected());
    assert_eq!(h.tick(20), None);
}

#[test]
fn tracker_reports_initial_state_once_then_transitions() {
    let mut s = MemorySurface::with_uniform_rows(600, 20);
    let nodes: Vec<NodeId> = (0..3).map(|c| placeholder(&mut s, c, 1000)).collect();

    let mut t = ViewportTracker::new();
    assert!(t.collect(&s).is_empty());
    t.connect(&TrackerConfig::default());
    for (c, n) in nodes.iter().enumerate() {
        t.observe(c, n);
    }

    let first = t.collect(&s);
    assert_eq!(first.len(), 3);
    assert_eq!(
        first.iter().map(|e| e.is_intersecting).collect::<Vec<_>>(),
        [true, false, false]
    );
    assert!(t.collect(&s).is_empty());

    s.set_scroll_offset(1_150);
    let moved = t.collect(&s);
    assert_eq!(
        moved
            .iter()
            .map(|e| (e.cluster, e.is_intersecting))
            .collect::<Vec<_>>(),
        [(0, false), (1, true)]
    );

    t.unobserve(&nodes[1]);
    s.set_scroll_offset(0);
    assert_eq!(t.collect(&s).len(), 1);

    t.disconnect_all();
    assert_eq!(t.observed_count(), 0);
    assert!(t.collect(&s).is_empty());
}

#[test]
fn scroll_into_view_honors_alignment() {
    let mut s = MemorySurface::with_uniform_rows(600, 20);
    let nodes: Vec<NodeId> = (0..10).map(|c| placeholder(&mut s, c, 1000)).collect();
    let target = nodes[5];

    for (align, expected) in [
        (Align::Start, 5_000),
        (Align::End, 5_400),
        (Align::Center, 5_200),
        (Align::Auto, 5_400),
    ] {
        RenderSurface::<LogRecord>::scroll_into_view(&mut s, &target, align);
        let request = s.take_scroll_request().unwrap();
        assert_eq!((request.node, request.offset), (target, expected), "{align:?}");
    }

    s.set_scroll_offset(9_000);
    RenderSurface::<LogRecord>::scroll_into_view(&mut s, &target, Align::Auto);
    assert_eq!(s.scroll_request().map(|r| r.offset), Some(5_000));
}

#[test]
fn replaced_nodes_are_dropped_with_their_rows() {
    let mut s = MemorySurface::with_uniform_rows(600, 20);
    let recs = records(3);
    let refs: Vec<&LogRecord> = recs.iter().collect();
    let full = RenderSurface::<LogRecord>::create_materialized_node(&mut s, 0, 0, &refs);
    RenderSurface::<LogRecord>::append(&mut s, full);
    assert_eq!(s.node_count(), 4);
    assert_eq!(RenderSurface::<LogRecord>::measure_height(&s, &full), 60);

    let row = RenderSurface::<LogRecord>::find_row(&s, &full, 2).unwrap();
    assert_eq!(s.bounds(row), Some((40, 20)));
    RenderSurface::<LogRecord>::set_highlighted(&mut s, &row, true);

    let ph = RenderSurface::<LogRecord>::create_placeholder_node(&mut s, 0, 60, "p");
    assert!(RenderSurface::<LogRecord>::replace(&mut s, &full, ph));
    assert!(!RenderSurface::<LogRecord>::replace(&mut s, &full, ph));
    assert_eq!(s.node_count(), 1);
    assert_eq!(s.highlighted().count(), 0);
    assert_eq!(
        RenderSurface::<LogRecord>::node_state(&s, &ph),
        Some(ClusterState::Placeholder)
    );
    assert_eq!(
        RenderSurface::<LogRecord>::find_node_for_cluster(&s, 0),
        Some(ph)
    );
}

#[test]
fn tween_moves_monotonically_and_lands_on_target() {
    for easing in [Easing::Linear, Easing::EaseOutCubic, Easing::EaseInOutCubic] {
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);

        let tween = ScrollTween::new(0, 1000, 0, 100, easing);
        let mut last = 0;
        for now in [0u64, 10, 20, 40, 80, 100, 120] {
            let offset = tween.offset_at(now);
            assert!(offset >= last, "{easing:?} at {now}");
            last = offset;
        }
        assert!(tween.is_done(100));
        assert_eq!(tween.offset_at(100), 1000);
    }

    let mut tween = ScrollTween::new(1000, 0, 0, 100, Easing::Linear);
    assert_eq!(tween.offset_at(50), 500);
    tween.redirect(50, 2000);
    assert_eq!(tween.from(), 500);
    assert_eq!(tween.target(), 2000);
    assert!(ScrollTween::new(7, 7, 0, 100, Easing::Linear).is_done(0));
}

proptest! {
    #[test]
    fn stack_layout_matches_naive_prefix_sums(
        heights in proptest::collection::vec(0u32..5_000, 0..200),
        updates in proptest::collection::vec((0usize..200, 0u32..5_000), 0..50),
    ) {
        let mut pushed = StackLayout::new();
        for &h in &heights {
            pushed.push(h);
        }
        let mut built = StackLayout::from_heights(&heights);
        let mut naive = heights.clone();

        for (slot, h) in updates {
            let exists = slot < naive.len();
            prop_assert_eq!(built.set(slot, h), exists);
            prop_assert_eq!(pushed.set(slot, h), exists);
            if exists {
                naive[slot] = h;
            }
        }

        let mut offset = 0u64;
        for (i, &h) in naive.iter().enumerate() {
            prop_assert_eq!(built.offset_of(i), offset);
            prop_assert_eq!(pushed.offset_of(i), offset);
            if h > 0 {
                prop_assert_eq!(built.slot_at(offset), Some(i));
                prop_assert_eq!(built.slot_at(offset + u64::from(h) - 1), Some(i));
            }
            offset += u64::from(h);
        }
        prop_assert_eq!(built.total(), offset);
        prop_assert_eq!(pushed.total(), offset);
        prop_assert_eq!(built.offset_of(naive.len()), offset);
        if naive.is_empty() {
            prop_assert_eq!(built.slot_at(0), None);
        } else {
            prop_assert_eq!(built.slot_at(offset + 10), Some(naive.len() - 1));
        }
    }
}
