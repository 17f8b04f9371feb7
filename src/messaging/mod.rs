/// Messaging module for cue notifications
///
/// Handlers broadcast what they did to the audio backend as [`Event`]s on a
/// shared [`EventBus`]. Subscribers (the CLI summary, tests) each get their
/// own unbounded channel; a handler without a bus behaves identically.
///
/// ## Architecture
///
/// ```text
/// ┌────────────┐   apply cues   ┌────────────┐    Event     ┌─────────────┐
/// │ CueHandler │ ─────────────> │ Dispatcher │ ───────────> │  Event Bus  │
/// │  (P1, P2)  │                │            │              │             │
/// └────────────┘                └────────────┘              └─────────────┘
///                                                                  │
///                                                                  │ Publishes
///                                                                  ▼
///                                                            ┌─────────────┐
///                                                            │ Subscribers │
///                                                            │ (summary,   │
///                                                            │  tests)     │
///                                                            └─────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let event_bus = EventBus::new();
/// let rx = event_bus.subscribe();
///
/// let mut session = MatchAudio::new(config, backend, Some(event_bus.clone()));
/// session.on_frame(&frame);
///
/// while let Ok(event) = rx.try_recv() {
///     println!("{}", event.description());
/// }
/// ```

pub mod bus;
pub mod events;

// Re-export commonly used types
pub use bus::EventBus;
pub use events::Event;
