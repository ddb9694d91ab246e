//! Event loop tests against an in-memory terminal and a scripted source.

use std::collections::{BTreeMap, VecDeque};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::config::{DashboardConfig, Target};
use crate::entity::{ContainerDescriptor, NodeDescriptor, PodDescriptor};
use crate::error::DashboardError;
use crate::quantity::Quantity;
use crate::source::RawUsage;
use crate::source::mock::MockSource;

use super::state::Screen;
use super::{App, Event, EventSource, Phase};

struct ScriptedEvents(VecDeque<Event>);

impl ScriptedEvents {
    fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self(events.into_iter().collect())
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Option<Event> {
        self.0.pop_front()
    }
}

fn node_source() -> MockSource {
    MockSource::new().with_node(NodeDescriptor {
        name: "worker-1".to_string(),
        kubelet_version: "v1.30.2".to_string(),
        os_image: "Ubuntu 22.04.4 LTS".to_string(),
        cpu_capacity: Quantity::parse("4").unwrap(),
        cpu_allocatable: Quantity::parse("3800m").unwrap(),
        memory_capacity: Quantity::parse("16Gi").unwrap(),
        memory_allocatable: Quantity::parse("15Gi").unwrap(),
    })
}

fn pod_source() -> MockSource {
    MockSource::new().with_pod(PodDescriptor {
        namespace: "default".to_string(),
        name: "web".to_string(),
        containers: ["a", "b", "c"]
            .into_iter()
            .map(ContainerDescriptor::unbounded)
            .collect(),
    })
}

fn node_target() -> Target {
    Target::Node {
        name: "worker-1".to_string(),
    }
}

fn pod_target(container: Option<&str>) -> Target {
    Target::Pod {
        namespace: None,
        name: "web".to_string(),
        container: container.map(str::to_string),
    }
}

fn usage(cpu_millis: i64, memory_bytes: i64) -> RawUsage {
    RawUsage {
        cpu_millis,
        memory_bytes,
    }
}

fn node_app(width: u16, height: u16) -> App<MockSource> {
    App::new(
        node_source(),
        node_target(),
        DashboardConfig::default(),
        (width, height),
    )
    .unwrap()
}

fn cpu_values(app: &App<MockSource>, band: usize) -> Vec<f64> {
    app.screen().generation().unwrap().series[band]
        .cpu
        .snapshot()
        .iter()
        .collect()
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_initial_draw_before_any_event() {
    let mut app = node_app(160, 40);
    let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();

    app.run_loop(&mut terminal, &mut ScriptedEvents(VecDeque::new()))
        .unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains(" Node "));
    assert!(text.contains("worker-1 / v1.30.2 / Ubuntu 22.04.4 LTS"));
    assert!(text.contains("Press q to quit"));
    assert!(text.contains("worker-1 CPU (Cap: 4000m / All: 3800m / Curr: 0m / Max: 0m)"));
    assert_eq!(app.source().metrics_calls(), 0);
    assert_eq!(app.phase(), Phase::Terminating);
}

#[test]
fn test_tick_updates_titles() {
    let mut app = node_app(160, 40);
    app.source().push_node_usage(usage(1500, 2_048_000_000));
    let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();

    app.run_loop(&mut terminal, &mut ScriptedEvents::new([Event::Tick]))
        .unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("Curr: 1’500m / Max: 1’500m"));
    assert!(text.contains("Curr: 2.0Gi / Max: 2.0Gi"));
    assert!(text.contains("Updated "));
}

#[test]
fn test_failed_fetch_keeps_previous_samples() {
    let mut app = node_app(40, 20);
    app.source().push_node_usage(usage(1000, 0));
    app.source().push_failure();
    app.source().push_node_usage(usage(2000, 0));

    app.on_tick();
    let after_first = app.screen().clone();
    app.on_tick();
    assert_eq!(app.screen(), &after_first);
    assert_eq!(app.phase(), Phase::Running);

    app.on_tick();
    let values = cpu_values(&app, 0);
    assert_eq!(values[values.len() - 3..], [0.0, 1.0, 2.0]);
    assert_eq!(app.source().metrics_calls(), 3);
}

#[test]
fn test_loop_survives_failed_ticks() {
    let mut app = node_app(40, 20);
    app.source().push_failure();
    app.source().push_node_usage(usage(500, 0));
    let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

    app.run_loop(
        &mut terminal,
        &mut ScriptedEvents::new([Event::Tick, Event::Tick]),
    )
    .unwrap();

    assert_eq!(app.source().metrics_calls(), 2);
    assert_eq!(cpu_values(&app, 0).last(), Some(&0.5));
}

#[test]
fn test_resize_resets_series() {
    let mut app = node_app(40, 20);
    app.source().push_node_usage(usage(3000, 5_000_000_000));
    let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

    app.run_loop(
        &mut terminal,
        &mut ScriptedEvents::new([Event::Tick, Event::Resize(100, 30)]),
    )
    .unwrap();

    let generation = app.screen().generation().unwrap();
    assert_eq!(generation.capacity, 45);
    let band = &generation.series[0];
    assert_eq!(band.cpu.running_max(), 0.0);
    assert_eq!(band.memory.running_max(), 0.0);
    assert!(band.cpu.snapshot().iter().all(|v| v == 0.0));
    assert_eq!(generation.layout.bands[0].cpu.height, 26);
}

#[test]
fn test_resize_keeps_startup_entity() {
    let mut app = App::new(
        pod_source(),
        pod_target(None),
        DashboardConfig::default(),
        (100, 100),
    )
    .unwrap();
    let entity = app.entity().clone();
    assert_eq!(app.source().descriptor_calls(), 1);

    app.on_resize(120, 100);
    app.on_resize(60, 40);

    assert_eq!(app.source().descriptor_calls(), 1);
    assert_eq!(app.entity(), &entity);
    assert_eq!(app.screen().generation().unwrap().series.len(), 3);
}

#[test]
fn test_narrow_resize_shows_notice_until_usable() {
    let mut app = node_app(40, 20);
    app.source().push_node_usage(usage(1000, 0));
    let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

    app.run_loop(
        &mut terminal,
        &mut ScriptedEvents::new([Event::Resize(8, 20), Event::Tick]),
    )
    .unwrap();
    assert!(matches!(app.screen(), Screen::TooNarrow { width: 8, .. }));
    assert!(screen_text(&terminal).contains("Terminal"));

    app.on_resize(40, 20);
    assert_eq!(app.screen().generation().unwrap().capacity, 15);
}

#[test]
fn test_quit_key_stops_loop() {
    for key in [
        KeyEvent::from(KeyCode::Char('q')),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let mut app = node_app(40, 20);
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        let mut events = ScriptedEvents::new([Event::Key(key), Event::Tick]);

        app.run_loop(&mut terminal, &mut events).unwrap();

        assert_eq!(app.phase(), Phase::Terminating);
        assert_eq!(app.source().metrics_calls(), 0);
        assert_eq!(events.0.len(), 1);
    }
}

#[test]
fn test_other_keys_are_ignored() {
    let mut app = node_app(40, 20);
    let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
    let mut events = ScriptedEvents::new([Event::Key(KeyEvent::from(KeyCode::Char('x')))]);

    app.run_loop(&mut terminal, &mut events).unwrap();
    assert!(events.0.is_empty());
}

#[test]
fn test_pod_bands_follow_container_order() {
    let mut app = App::new(
        pod_source(),
        pod_target(None),
        DashboardConfig::default(),
        (100, 100),
    )
    .unwrap();
    // Container "b" is missing from the reading and counts as zero.
    app.source().push_pod_usage(BTreeMap::from([
        ("a".to_string(), usage(100, 0)),
        ("c".to_string(), usage(300, 0)),
        ("sidecar".to_string(), usage(999, 0)),
    ]));

    app.on_tick();

    let generation = app.screen().generation().unwrap();
    let rows: Vec<u16> = generation.layout.bands.iter().map(|b| b.cpu.y).collect();
    assert_eq!(rows, vec![4, 36, 68]);
    let latest: Vec<f64> = generation.series.iter().map(|s| s.cpu.latest()).collect();
    assert_eq!(latest, vec![0.1, 0.0, 0.3]);
}

#[test]
fn test_pod_with_container_filter() {
    let app = App::new(
        pod_source(),
        pod_target(Some("b")),
        DashboardConfig::default(),
        (100, 100),
    )
    .unwrap();

    assert_eq!(app.entity().band_names(), vec!["b"]);
    let generation = app.screen().generation().unwrap();
    assert_eq!(generation.layout.bands.len(), 1);
    assert_eq!(generation.layout.bands[0].cpu.height, 96);
}

#[test]
fn test_startup_errors() {
    let err = App::new(
        pod_source(),
        pod_target(Some("z")),
        DashboardConfig::default(),
        (100, 40),
    )
    .err()
    .unwrap();
    assert!(matches!(err, DashboardError::ContainerNotFound { .. }));

    let err = App::new(
        node_source(),
        node_target(),
        DashboardConfig::default(),
        (11, 40),
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        DashboardError::TerminalTooNarrow { width: 11, min: 12 }
    ));

    let config = DashboardConfig {
        locale: "german".to_string(),
        ..DashboardConfig::default()
    };
    let err = App::new(node_source(), node_target(), config, (100, 40))
        .err()
        .unwrap();
    assert!(matches!(err, DashboardError::Locale(_)));

    let err = App::new(
        MockSource::new(),
        node_target(),
        DashboardConfig::default(),
        (100, 40),
    )
    .err()
    .unwrap();
    assert!(matches!(err, DashboardError::Source(_)));
}
