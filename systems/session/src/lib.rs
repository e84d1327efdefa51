#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration system.
//!
//! Owns everything above the world's rule engine: the play-state machine,
//! the remaining-lives counter, the timed death script, and the scripted
//! camera flights. Each frame it consumes the previous frame's events and
//! decides which world commands to issue, so the world itself stays free of
//! pacing concerns. Hazard clocks keep running during scripted animations.

use std::time::Duration;

use maze_chase_core::{ActorId, Command, DeathCause, Event};

/// Longest frame delta forwarded to the world, in seconds. Longer frames
/// (debugger stalls, window drags) are clamped rather than simulated.
const MAX_FRAME_SECONDS: f32 = 0.15;

/// Seconds into the death script at which the player is respawned.
const DEATH_RESPAWN_AT: f32 = 3.8;
/// Seconds into the death script at which the session resolves the death.
const DEATH_RESOLVE_AT: f32 = 4.7;

/// Camera flight speeds; the flight finishes when `time * speed` reaches one.
const INTRO_CAMERA_SPEED: f32 = 0.5;
const DEATH_PAN_CAMERA_SPEED: f32 = 2.0;
const RECOVERY_CAMERA_SPEED: f32 = 1.1111;
const TELEPORT_CAMERA_SPEED: f32 = 1.5;

/// Coarse play state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Intro flight before control is handed to the player.
    LevelStart,
    /// Normal play; the world ticks.
    Game,
    /// Play suspended; nothing advances.
    Pause,
    /// Death script running; only hazards advance.
    Animation,
    /// All coins collected.
    Victory,
    /// Death resolved with no lives remaining.
    GameOver,
}

/// What the camera is currently doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Following the player without a scripted flight.
    Idle,
    /// Flying from the level overview down to the player.
    LevelIntro,
    /// Panning toward the dying player.
    DeathPan,
    /// Flying back to the respawned player.
    DeathRecovery,
    /// Chasing the player through a teleport jump.
    TeleportFlight,
}

/// A single scripted camera flight with smoothstep easing.
#[derive(Clone, Copy, Debug)]
struct CameraScript {
    mode: CameraMode,
    time: f32,
    speed: f32,
}

impl CameraScript {
    fn idle() -> Self {
        Self {
            mode: CameraMode::Idle,
            time: 1.0,
            speed: 1.0,
        }
    }

    fn flight(mode: CameraMode, speed: f32) -> Self {
        Self {
            mode,
            time: 0.0,
            speed,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.time += dt * self.speed;
        if self.done() && self.mode != CameraMode::Idle {
            *self = Self::idle();
        }
    }

    fn done(&self) -> bool {
        self.time >= 1.0
    }

    fn progress(&self) -> f32 {
        let t = self.time.clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

/// Read-only description of the camera for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    /// Active flight, or [`CameraMode::Idle`].
    pub mode: CameraMode,
    /// Smoothstepped interpolation factor in `[0, 1]`.
    pub progress: f32,
}

/// Scripted sequence the session is currently playing.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Animation {
    None,
    Death { time: f32, respawn_issued: bool },
    Teleport,
}

/// State machine driving one play-through of a level.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    lives: u32,
    animation: Animation,
    camera: CameraScript,
    last_death: Option<DeathCause>,
}

impl Session {
    /// Starts a session with the provided number of spare lives.
    #[must_use]
    pub fn new(lives: u32) -> Self {
        Self {
            state: SessionState::LevelStart,
            lives,
            animation: Animation::None,
            camera: CameraScript::flight(CameraMode::LevelIntro, INTRO_CAMERA_SPEED),
            last_death: None,
        }
    }

    /// Advances the session by one frame.
    ///
    /// `events` are the world events of the previous frame; `out` receives
    /// the commands the world should apply this frame.
    pub fn advance(&mut self, dt: Duration, events: &[Event], out: &mut Vec<Command>) {
        let dt = dt.as_secs_f32().min(MAX_FRAME_SECONDS);
        self.consume(events);

        match self.state {
            SessionState::LevelStart => {
                self.camera.advance(dt);
                out.push(Command::AdvanceHazards {
                    dt: Duration::from_secs_f32(dt),
                });
                if self.camera.mode == CameraMode::Idle {
                    self.state = SessionState::Game;
                }
            }
            SessionState::Game => {
                self.camera.advance(dt);
                out.push(Command::Tick {
                    dt: Duration::from_secs_f32(dt),
                });
            }
            SessionState::Pause => {}
            SessionState::Animation => {
                self.camera.advance(dt);
                out.push(Command::AdvanceHazards {
                    dt: Duration::from_secs_f32(dt),
                });
                match &mut self.animation {
                    Animation::Death {
                        time,
                        respawn_issued,
                    } => {
                        *time += dt;
                        if *time > DEATH_RESPAWN_AT && !*respawn_issued {
                            *respawn_issued = true;
                            if self.lives > 0 {
                                out.push(Command::RespawnPlayer);
                                self.camera = CameraScript::flight(
                                    CameraMode::DeathRecovery,
                                    RECOVERY_CAMERA_SPEED,
                                );
                            }
                        }
                        if *time > DEATH_RESOLVE_AT {
                            self.animation = Animation::None;
                            if self.lives > 0 {
                                self.lives -= 1;
                                self.state = SessionState::Game;
                            } else {
                                self.state = SessionState::GameOver;
                            }
                        }
                    }
                    Animation::Teleport => {
                        if self.camera.mode == CameraMode::Idle {
                            self.animation = Animation::None;
                            self.state = SessionState::Game;
                        }
                    }
                    Animation::None => {
                        self.state = SessionState::Game;
                    }
                }
            }
            SessionState::Victory | SessionState::GameOver => {
                self.camera.advance(dt);
            }
        }
    }

    /// Suspends or resumes play; only effective during play and pause.
    pub fn set_paused(&mut self, paused: bool) {
        match (self.state, paused) {
            (SessionState::Game, true) => self.state = SessionState::Pause,
            (SessionState::Pause, false) => self.state = SessionState::Game,
            _ => {}
        }
    }

    /// Current play state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Spare lives remaining.
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Cause of the most recent death, if any occurred this session.
    #[must_use]
    pub fn last_death(&self) -> Option<DeathCause> {
        self.last_death
    }

    /// Camera description for the presentation layer.
    #[must_use]
    pub fn camera(&self) -> CameraSnapshot {
        CameraSnapshot {
            mode: self.camera.mode,
            progress: self.camera.progress(),
        }
    }

    fn consume(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerDied { cause } => {
                    self.state = SessionState::Animation;
                    self.animation = Animation::Death {
                        time: 0.0,
                        respawn_issued: false,
                    };
                    self.last_death = Some(*cause);
                    self.camera =
                        CameraScript::flight(CameraMode::DeathPan, DEATH_PAN_CAMERA_SPEED);
                }
                Event::LevelCleared => {
                    self.state = SessionState::Victory;
                    self.animation = Animation::None;
                }
                Event::TeleportTraversed { actor, .. }
                    if *actor == ActorId::PLAYER && self.state == SessionState::Game =>
                {
                    self.state = SessionState::Animation;
                    self.animation = Animation::Teleport;
                    self.camera =
                        CameraScript::flight(CameraMode::TeleportFlight, TELEPORT_CAMERA_SPEED);
                }
                _ => {}
            }
        }
    }
}
