//! End-to-End Tests for the timer runner.
//!
//! These tests drive a complete daemon core (runner, engine, completion
//! ports, session recorder) on tokio's paused clock:
//! - Pomodoro completion into an idle short break
//! - Auto-started break after the grace delay
//! - Long break after the fourth pomodoro
//! - Manual mode switch while running
//! - Completion side effects and their failure isolation

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use pomofocus::daemon::{
    run_recorder, Command, CommandResult, ControlAdapter, ControlError, CompletionPorts,
    MockSessionRecorder, StatusReport, TimerEngine, TimerError, TimerEvent, TimerHandle,
    TimerRunner,
};
use pomofocus::notification::{MockNotifier, NotificationPermission};
use pomofocus::sound::{MockSoundPlayer, SoundSource};
use pomofocus::types::{TaskId, TimerConfig, TimerMode, TimerStatus};

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    handle: TimerHandle,
    runner: JoinHandle<TimerEngine>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    sound: Arc<MockSoundPlayer>,
    notifier: Arc<MockNotifier>,
    recorder: MockSessionRecorder,
}

impl Harness {
    fn new(config: TimerConfig) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = mpsc::unbounded_channel();

        let sound = Arc::new(MockSoundPlayer::new());
        let notifier = Arc::new(MockNotifier::new());
        let recorder = MockSessionRecorder::new();
        tokio::spawn(run_recorder(
            recorder.clone(),
            session_rx,
            Duration::from_secs(5),
        ));

        let ports = CompletionPorts::new()
            .with_sound(sound.clone(), SoundSource::Chime)
            .with_notifier(notifier.clone())
            .with_sessions(session_tx);
        let engine = TimerEngine::new(config, ports, event_tx);
        let (runner, handle) = TimerRunner::new(engine, ControlAdapter::new());

        Self {
            handle,
            runner: tokio::spawn(runner.run()),
            events,
            sound,
            notifier,
            recorder,
        }
    }

    async fn send(&self, command: Command) -> CommandResult {
        self.handle.send(command).await.unwrap()
    }

    async fn status(&self) -> StatusReport {
        self.send(Command::Status).await.unwrap()
    }

    fn drain_events(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

fn scenario_config() -> TimerConfig {
    TimerConfig {
        pomodoro_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 15,
        long_break_interval: 4,
        auto_start_break: false,
        ..TimerConfig::default()
    }
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

// ============================================================================
// Completion flow
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pomodoro_completes_into_idle_short_break() {
    let mut h = Harness::new(scenario_config());
    h.send(Command::Start).await.unwrap();

    sleep(secs(1500) + Duration::from_millis(500)).await;

    let report = h.status().await;
    assert_eq!(report.snapshot.mode, TimerMode::ShortBreak);
    assert_eq!(report.snapshot.status, TimerStatus::Idle);
    assert_eq!(report.snapshot.seconds_remaining, 300);
    assert_eq!(report.snapshot.completed_pomodoros, 1);

    let completed: Vec<_> = h
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            TimerEvent::Completed(event) => Some(event),
            _ => None,
        })
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].completed_mode, TimerMode::Pomodoro);
    assert_eq!(completed[0].planned_duration_seconds, 1500);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_keeps_one_second_pace() {
    let h = Harness::new(scenario_config());
    h.send(Command::Start).await.unwrap();

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(h.status().await.snapshot.seconds_remaining, 1490);

    h.send(Command::Pause).await.unwrap();
    sleep(secs(60)).await;
    assert_eq!(h.status().await.snapshot.seconds_remaining, 1490);

    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(h.status().await.snapshot.seconds_remaining, 1485);
}

#[tokio::test(start_paused = true)]
async fn test_break_auto_starts_after_grace_delay() {
    let config = TimerConfig {
        auto_start_break: true,
        ..scenario_config()
    };
    let mut h = Harness::new(config);
    h.send(Command::Start).await.unwrap();

    sleep(secs(1500) + Duration::from_millis(500)).await;
    let report = h.status().await;
    assert_eq!(report.snapshot.mode, TimerMode::ShortBreak);
    assert_eq!(report.snapshot.status, TimerStatus::Idle);

    sleep(secs(1)).await;
    let report = h.status().await;
    assert_eq!(report.snapshot.status, TimerStatus::Running);
    assert_eq!(report.snapshot.seconds_remaining, 300);

    assert!(h.drain_events().contains(&TimerEvent::AutoStartScheduled {
        mode: TimerMode::ShortBreak,
        delay_ms: 1000,
    }));
}

#[tokio::test(start_paused = true)]
async fn test_manual_command_cancels_auto_start() {
    let config = TimerConfig {
        auto_start_break: true,
        ..scenario_config().with_pomodoro_minutes(1)
    };
    let mut h = Harness::new(config);
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;

    h.send(Command::Reset).await.unwrap();
    sleep(secs(5)).await;

    let report = h.status().await;
    assert_eq!(report.snapshot.mode, TimerMode::ShortBreak);
    assert_eq!(report.snapshot.status, TimerStatus::Idle);
    assert!(h.drain_events().contains(&TimerEvent::AutoStartCancelled));
}

#[tokio::test(start_paused = true)]
async fn test_pause_while_auto_start_pending_cancels_it() {
    let config = TimerConfig {
        auto_start_break: true,
        ..scenario_config().with_pomodoro_minutes(1)
    };
    let h = Harness::new(config);
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;

    assert!(h.send(Command::Pause).await.is_ok());
    sleep(secs(5)).await;
    assert_eq!(h.status().await.snapshot.status, TimerStatus::Idle);

    // Nothing pending any more.
    assert_eq!(
        h.send(Command::Pause).await,
        Err(ControlError::Timer(TimerError::NotRunning))
    );
}

#[tokio::test(start_paused = true)]
async fn test_fourth_pomodoro_leads_to_long_break() {
    let h = Harness::new(scenario_config().with_pomodoro_minutes(1));

    for _ in 0..3 {
        h.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(60_500)).await;
        assert_eq!(h.status().await.snapshot.mode, TimerMode::ShortBreak);
        h.send(Command::SwitchMode(TimerMode::Pomodoro)).await.unwrap();
    }
    assert_eq!(h.status().await.snapshot.completed_pomodoros, 3);

    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;

    let report = h.status().await;
    assert_eq!(report.snapshot.completed_pomodoros, 4);
    assert_eq!(report.snapshot.mode, TimerMode::LongBreak);
    assert_eq!(report.snapshot.seconds_remaining, 900);
}

#[tokio::test(start_paused = true)]
async fn test_switch_mode_while_running_is_not_a_completion() {
    let mut h = Harness::new(scenario_config());
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(600_500)).await;
    assert_eq!(h.status().await.snapshot.seconds_remaining, 900);

    let report = h
        .send(Command::SwitchMode(TimerMode::ShortBreak))
        .await
        .unwrap();

    assert_eq!(report.snapshot.status, TimerStatus::Idle);
    assert_eq!(report.snapshot.seconds_remaining, 300);
    assert_eq!(report.snapshot.completed_pomodoros, 0);
    assert!(!h
        .drain_events()
        .iter()
        .any(|e| matches!(e, TimerEvent::Completed(_))));
    assert_eq!(h.sound.play_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_right_after_completion_starts_next_mode() {
    let h = Harness::new(scenario_config().with_pomodoro_minutes(1));
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_001)).await;

    let report = h.send(Command::Start).await.unwrap();
    assert_eq!(report.snapshot.mode, TimerMode::ShortBreak);
    assert_eq!(report.snapshot.status, TimerStatus::Running);
    assert_eq!(report.snapshot.seconds_remaining, 300);
}

// ============================================================================
// Side effects
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_completion_side_effects() {
    let config = TimerConfig {
        volume: 70,
        ..scenario_config().with_pomodoro_minutes(1)
    };
    let h = Harness::new(config);
    h.send(Command::SelectTask(Some(TaskId::new("write-report"))))
        .await
        .unwrap();
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;

    assert_eq!(h.sound.get_play_calls(), vec![(SoundSource::Chime, 70)]);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Pomodoro Timer");
    assert_eq!(sent[0].body, "Pomodoro complete! Time for a short break.");

    let recorded = h.recorder.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].associated_task_id,
        Some(TaskId::new("write-report"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_disabled_sound_and_notifications_still_record() {
    let config = TimerConfig {
        sound_enabled: false,
        notifications_enabled: false,
        ..scenario_config().with_pomodoro_minutes(1)
    };
    let h = Harness::new(config);
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;

    assert_eq!(h.sound.play_count(), 0);
    assert_eq!(h.notifier.sent_count(), 0);
    assert_eq!(h.recorder.record_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failing_ports_do_not_stop_the_timer() {
    let config = TimerConfig {
        auto_start_break: true,
        auto_start_delay_ms: 0,
        ..scenario_config().with_pomodoro_minutes(1)
    };
    let h = Harness::new(config);
    h.sound.set_should_fail(true);
    h.notifier.set_should_fail(true);
    h.recorder.set_should_fail(true);

    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;

    let report = h.status().await;
    assert_eq!(report.snapshot.mode, TimerMode::ShortBreak);
    assert_eq!(report.snapshot.status, TimerStatus::Running);
    assert_eq!(report.snapshot.completed_pomodoros, 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_recorder_does_not_delay_the_countdown() {
    let h = Harness::new(scenario_config().with_pomodoro_minutes(1));
    h.recorder.set_delay(secs(3));

    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(60_500)).await;
    h.send(Command::Start).await.unwrap();
    sleep(Duration::from_millis(2_200)).await;

    assert_eq!(h.status().await.snapshot.seconds_remaining, 298);
    assert_eq!(h.recorder.record_count(), 0);

    sleep(secs(2)).await;
    assert_eq!(h.recorder.record_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_undetermined_permission_is_requested_once() {
    let h = Harness::new(scenario_config().with_pomodoro_minutes(1));
    h.notifier.set_permission(NotificationPermission::Undetermined);
    h.notifier.set_grant_on_request(false);

    for _ in 0..2 {
        h.send(Command::SwitchMode(TimerMode::Pomodoro)).await.unwrap();
        h.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(60_500)).await;
    }

    assert_eq!(h.notifier.permission_request_count(), 1);
    assert_eq!(h.notifier.sent_count(), 0);
    assert_eq!(h.status().await.snapshot.completed_pomodoros, 2);
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_runner_stops_when_handles_dropped() {
    let h = Harness::new(scenario_config());
    h.send(Command::Start).await.unwrap();

    let Harness { handle, runner, .. } = h;
    drop(handle);

    let engine = runner.await.unwrap();
    assert_eq!(engine.state().status(), TimerStatus::Running);
}
