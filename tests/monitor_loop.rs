use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use pitft_system_monitor::clock::{Clock, ManualClock};
use pitft_system_monitor::errors::{DriverError, HardwareInitError, InitPhase, LineError, TransferError};
use pitft_system_monitor::framebuffer::PixelBuffer;
use pitft_system_monitor::hardware::{Delay, InputLine};
use pitft_system_monitor::input::ButtonPair;
use pitft_system_monitor::metrics::{MetricsProvider, NetworkSnapshot, ProcessEntry, SystemSnapshot};
use pitft_system_monitor::navigation::CycleStatus;
use pitft_system_monitor::pages::{Page, PageRenderer, PageSnapshot};
use pitft_system_monitor::shutdown::StopFlag;
use pitft_system_monitor::st7789::command::RAMWR;
use pitft_system_monitor::st7789::{DisplayDriver, Transport, TransportFactory};
use pitft_system_monitor::{Monitor, MonitorOptions};

#[derive(Default)]
struct BusLog {
    resets: usize,
    memory_writes: usize,
    released: bool,
}

struct FakeTransport {
    log: Rc<RefCell<BusLog>>,
    fail_frames: bool,
}

impl Transport for FakeTransport {
    fn send_command(&mut self, command: u8) -> Result<(), TransferError> {
        if command == RAMWR {
            let mut log = self.log.borrow_mut();
            // The first memory write is the power-up clear.
            if self.fail_frames && log.memory_writes > 0 {
                return Err(TransferError::Bus("EIO".into()));
            }
            log.memory_writes += 1;
        }
        Ok(())
    }

    fn send_data(&mut self, _data: &[u8]) -> Result<(), TransferError> {
        Ok(())
    }

    fn reset<D: Delay>(&mut self, _delay: &mut D) -> Result<(), TransferError> {
        self.log.borrow_mut().resets += 1;
        Ok(())
    }
}

impl Drop for FakeTransport {
    fn drop(&mut self) {
        self.log.borrow_mut().released = true;
    }
}

struct FakeFactory {
    log: Rc<RefCell<BusLog>>,
    fail_frames: bool,
    open_error: Option<InitPhase>,
}

impl TransportFactory for FakeFactory {
    type Transport = FakeTransport;

    fn open(&mut self) -> Result<FakeTransport, HardwareInitError> {
        if let Some(phase) = self.open_error {
            return Err(HardwareInitError::new(phase, "Permission denied"));
        }
        Ok(FakeTransport {
            log: self.log.clone(),
            fail_frames: self.fail_frames,
        })
    }
}

struct NoDelay;
impl Delay for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

/// Reads pressed on the listed poll numbers (counted from 0).
struct ScriptedButton {
    polls: usize,
    pressed_on: HashSet<usize>,
}

impl ScriptedButton {
    fn pressed_on(polls: &[usize]) -> Self {
        Self {
            polls: 0,
            pressed_on: polls.iter().copied().collect(),
        }
    }
}

impl InputLine for ScriptedButton {
    fn is_low(&mut self) -> Result<bool, LineError> {
        let pressed = self.pressed_on.contains(&self.polls);
        self.polls += 1;
        Ok(pressed)
    }
}

#[derive(Default)]
struct CountingMetrics {
    system: usize,
    network: usize,
    processes: usize,
}

impl MetricsProvider for CountingMetrics {
    fn system(&mut self) -> SystemSnapshot {
        self.system += 1;
        SystemSnapshot::default()
    }

    fn network(&mut self) -> NetworkSnapshot {
        self.network += 1;
        NetworkSnapshot::default()
    }

    fn top_processes(&mut self, count: usize) -> Vec<ProcessEntry> {
        self.processes += 1;
        assert_eq!(count, 5);
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Frame {
    Splash,
    Page {
        slot: usize,
        page: Page,
        status: CycleStatus,
    },
}

#[derive(Default)]
struct RecordingRenderer {
    frames: RefCell<Vec<Frame>>,
}

impl RecordingRenderer {
    fn page_slots(&self) -> Vec<usize> {
        self.frames
            .borrow()
            .iter()
            .filter_map(|f| match f {
                Frame::Page { slot, .. } => Some(*slot),
                Frame::Splash => None,
            })
            .collect()
    }
}

impl PageRenderer for RecordingRenderer {
    fn render(&self, slot: usize, snapshot: &PageSnapshot, status: CycleStatus) -> PixelBuffer {
        self.frames.borrow_mut().push(Frame::Page {
            slot,
            page: snapshot.page(),
            status,
        });
        PixelBuffer::with_size(1, 1)
    }

    fn render_splash(&self, _auto_cycle: Option<Duration>) -> PixelBuffer {
        self.frames.borrow_mut().push(Frame::Splash);
        PixelBuffer::with_size(1, 1)
    }
}

/// Raises the stop flag once `run_for` of virtual time has passed.
struct StoppingClock {
    inner: ManualClock,
    start: Instant,
    run_for: Duration,
    stop: StopFlag,
}

impl StoppingClock {
    fn new(run_for: Duration, stop: StopFlag) -> Self {
        let inner = ManualClock::new();
        let start = inner.now();
        Self {
            inner,
            start,
            run_for,
            stop,
        }
    }
}

impl Clock for StoppingClock {
    fn now(&self) -> Instant {
        self.inner.now()
    }

    fn sleep(&self, duration: Duration) {
        self.inner.sleep(duration);
        if self.inner.now() - self.start >= self.run_for {
            self.stop.request_stop();
        }
    }
}

fn options() -> MonitorOptions {
    MonitorOptions {
        pages: vec![Page::System, Page::Network, Page::Processes],
        auto_cycle_interval: Some(Duration::from_secs(120)),
        manual_override: Duration::from_secs(10),
        poll_interval: Duration::from_millis(100),
        refresh_intervals: vec![
            Duration::from_secs(3),
            Duration::from_secs(3),
            Duration::from_millis(1500),
        ],
        top_process_count: 5,
        splash_duration: Duration::from_secs(4),
        frame_dump_dir: None,
    }
}

struct Harness {
    bus: Rc<RefCell<BusLog>>,
    metrics: CountingMetrics,
    renderer: RecordingRenderer,
}

impl Harness {
    fn new() -> Self {
        Self {
            bus: Rc::default(),
            metrics: CountingMetrics::default(),
            renderer: RecordingRenderer::default(),
        }
    }

    /// Poll numbers count from the first loop iteration after the splash,
    /// one poll every 100 ms.
    fn run(
        &mut self,
        seconds: u64,
        previous: &[usize],
        next: &[usize],
        factory: FakeFactory,
    ) -> Result<(), DriverError> {
        let stop = StopFlag::new();
        let clock = StoppingClock::new(Duration::from_secs(seconds), stop.clone());
        let display = DisplayDriver::new(factory, NoDelay);
        let buttons = ButtonPair::new(
            ScriptedButton::pressed_on(previous),
            ScriptedButton::pressed_on(next),
        );
        Monitor::new(
            display,
            buttons,
            &mut self.metrics,
            &self.renderer,
            &clock,
            stop,
            options(),
        )
        .run()
    }

    fn factory(&self) -> FakeFactory {
        FakeFactory {
            log: self.bus.clone(),
            fail_frames: false,
            open_error: None,
        }
    }
}

#[test]
fn auto_cycles_through_pages_and_refreshes() {
    let mut h = Harness::new();
    let factory = h.factory();
    h.run(250, &[], &[], factory).unwrap();

    let slots = h.renderer.page_slots();
    assert_eq!(h.renderer.frames.borrow()[0], Frame::Splash);

    // Page 0 from t=4 s every 3 s until the auto-cycle at t=124 s.
    assert_eq!(slots.iter().filter(|&&s| s == 0).count(), 40);
    let first_change = slots.iter().position(|&s| s == 1).unwrap();
    assert_eq!(first_change, 40);
    assert!(slots[first_change..].iter().all(|&s| s >= 1));
    assert_eq!(slots.last(), Some(&2));

    assert_eq!(h.metrics.system, 40);
    assert!(h.metrics.network >= 40);
    assert!(h.metrics.processes >= 1);

    let bus = h.bus.borrow();
    assert_eq!(bus.resets, 1);
    // Power-up clear, splash, then every rendered page.
    assert_eq!(bus.memory_writes, 2 + slots.len());
    assert!(bus.released);
}

#[test]
fn button_press_overrides_auto_cycle() {
    let mut h = Harness::new();
    let factory = h.factory();
    // Next pressed at t=10 s (poll 60 after the splash).
    h.run(140, &[], &[60], factory).unwrap();

    let frames = h.renderer.frames.borrow();
    let pressed = frames
        .iter()
        .find(|f| matches!(f, Frame::Page { slot: 1, .. }))
        .unwrap();
    assert_eq!(
        *pressed,
        Frame::Page {
            slot: 1,
            page: Page::Network,
            status: CycleStatus::Manual {
                remaining: Duration::from_secs(10)
            },
        }
    );

    // Override ends at t=20 s; auto deadline re-armed to t=130 s.
    let slots = h.renderer.page_slots();
    let to_two = slots.iter().position(|&s| s == 2).unwrap();
    let network_frames = slots[..to_two].iter().filter(|&&s| s == 1).count();
    // Network refreshes every 3 s from t=10 s to t=127 s.
    assert_eq!(network_frames, 40);

    let auto_frames = frames.iter().any(|f| {
        matches!(
            f,
            Frame::Page {
                slot: 1,
                status: CycleStatus::Auto { .. },
                ..
            }
        )
    });
    assert!(auto_frames);
}

#[test]
fn press_on_the_auto_deadline_wins_over_the_tick() {
    let mut h = Harness::new();
    let factory = h.factory();
    // The auto deadline falls at t=124 s, poll 1200 after the splash.
    h.run(250, &[], &[1200], factory).unwrap();

    let slots = h.renderer.page_slots();
    assert_eq!(slots.iter().filter(|&&s| s == 0).count(), 40);

    let first_change = slots.iter().position(|&s| s != 0).unwrap();
    assert_eq!(slots[first_change], 1);
    assert_eq!(
        h.renderer.frames.borrow()[first_change + 1],
        Frame::Page {
            slot: 1,
            page: Page::Network,
            status: CycleStatus::Manual {
                remaining: Duration::from_secs(10)
            },
        }
    );

    // Next auto advance at t=244 s, 120 s after the press.
    let to_two = slots.iter().position(|&s| s == 2).unwrap();
    assert_eq!(to_two - first_change, 40);
    assert!(slots[first_change..to_two].iter().all(|&s| s == 1));
    assert!(slots[to_two..].iter().all(|&s| s == 2));
}

#[test]
fn both_buttons_in_one_poll_cancel_out() {
    let mut h = Harness::new();
    let factory = h.factory();
    h.run(10, &[5], &[5], factory).unwrap();

    let frames = h.renderer.frames.borrow();
    assert!(frames.iter().any(|f| {
        *f == Frame::Page {
            slot: 0,
            page: Page::System,
            status: CycleStatus::Manual {
                remaining: Duration::from_secs(10),
            },
        }
    }));
    assert!(h.renderer.page_slots().iter().all(|&s| s == 0));
}

#[test]
fn transfer_errors_drop_frames_but_keep_running() {
    let mut h = Harness::new();
    let mut factory = h.factory();
    factory.fail_frames = true;
    h.run(20, &[], &[], factory).unwrap();

    assert!(h.renderer.page_slots().len() > 3);
    let bus = h.bus.borrow();
    assert_eq!(bus.memory_writes, 1);
    assert!(bus.released);
}

#[test]
fn init_failure_is_reported_and_nothing_rendered() {
    let mut h = Harness::new();
    let mut factory = h.factory();
    factory.open_error = Some(InitPhase::Gpio);

    match h.run(20, &[], &[], factory) {
        Err(DriverError::Init(e)) => assert_eq!(e.phase, InitPhase::Gpio),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(h.renderer.frames.borrow().is_empty());
    assert_eq!(h.bus.borrow().resets, 0);
}
