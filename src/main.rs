//! Exploding Cubes entry point
//!
//! The real game runs inside a host AR framework that drives [`Session`].
//! Natively this runs a headless match against a scripted host: two surfaces
//! are detected, one is picked, cubes land a moment after spawning and the
//! player shoots at a steady rhythm.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};

use exploding_cubes::assets::AssetCatalog;
use exploding_cubes::sim::{
    AnchorId, BodyRef, EntityId, GameEvent, GamePhase, SurfaceMeasurement, Tap, TapRay,
};
use exploding_cubes::{Result, Session, Settings};

/// Seconds a spawned cube falls before touching the floor
const FALL_SECS: f32 = 0.5;
/// Seconds between player taps
const TAP_INTERVAL_SECS: f32 = 0.7;
/// Seconds a shot flies before it reaches its target
const FLIGHT_SECS: f32 = 0.3;
/// Give up on endless matches after this long
const MAX_DEMO_SECS: f32 = 120.0;

/// Contact the scripted physics will report at `due`
struct PendingContact {
    due: f32,
    a: BodyRef,
    b: BodyRef,
}

/// Scripted stand-in for the AR framework
struct DemoHost {
    time: f32,
    detected: bool,
    remeasured: bool,
    next_tap: f32,
    contacts: VecDeque<PendingContact>,
    /// Cubes on the floor, oldest first
    landed: VecDeque<EntityId>,
    shots: u32,
}

impl DemoHost {
    fn new() -> Self {
        Self {
            time: 0.0,
            detected: false,
            remeasured: false,
            next_tap: 1.0,
            contacts: VecDeque::new(),
            landed: VecDeque::new(),
            shots: 0,
        }
    }

    fn surface(anchor: u64, extent: Vec2) -> SurfaceMeasurement {
        SurfaceMeasurement {
            anchor: AnchorId(anchor),
            origin: Vec3::new(0.0, -1.0, -1.5),
            center: Vec3::ZERO,
            extent,
        }
    }

    /// Feed callbacks due at the current time
    fn drive(&mut self, session: &mut Session) {
        let t = self.time;
        if !self.detected && t >= 0.2 {
            self.detected = true;
            session.surface_added(Self::surface(1, Vec2::new(0.6, 0.4)));
            session.surface_added(Self::surface(2, Vec2::new(1.2, 0.9)));
        }
        if !self.remeasured && t >= 0.6 {
            self.remeasured = true;
            session.surface_updated(Self::surface(2, Vec2::new(2.0, 1.5)));
        }

        while self.contacts.front().is_some_and(|c| c.due <= t) {
            if let Some(contact) = self.contacts.pop_front() {
                session.contact_began(contact.a, contact.b);
            }
        }

        if t >= self.next_tap {
            self.next_tap += TAP_INTERVAL_SECS;
            let selecting = session.state().phase != GamePhase::PlayActive;
            session.tapped(Tap {
                surface_hit: selecting.then_some(AnchorId(2)),
                ray: Some(TapRay {
                    near: Vec3::ZERO,
                    far: Vec3::new(0.0, -60.0, -300.0),
                }),
                viewpoint: Vec3::ZERO,
            });
        }
    }

    /// React to what the simulation did
    fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::CubeSpawned { id, .. } => self.contacts.push_back(PendingContact {
                    due: self.time + FALL_SECS,
                    a: BodyRef::Cube(id),
                    b: BodyRef::Surface(AnchorId(2)),
                }),
                GameEvent::CubeTicking { id } => self.landed.push_back(id),
                GameEvent::CubeRemoved { id } => self.landed.retain(|c| *c != id),
                GameEvent::ProjectileFired { id, .. } => {
                    self.shots += 1;
                    // Every other shot finds the oldest cube on the floor
                    if self.shots % 2 == 0 {
                        if let Some(&cube) = self.landed.front() {
                            self.contacts.push_back(PendingContact {
                                due: self.time + FLIGHT_SECS,
                                a: BodyRef::Projectile(id),
                                b: BodyRef::Cube(cube),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Exploding Cubes (headless) starting...");

    let settings = match std::env::var("EXPLODING_CUBES_SETTINGS") {
        Ok(path) => Settings::load(path)?,
        Err(_) => Settings::default(),
    };
    let assets = match std::env::var("EXPLODING_CUBES_ASSETS") {
        Ok(dir) => AssetCatalog::load(dir)?,
        Err(_) => AssetCatalog::placeholders(),
    };

    let mut session = Session::from_settings(&settings, assets);
    let mut host = DemoHost::new();
    log::info!("World gravity {:?}", session.world_gravity());
    let frame_dt = 1.0 / 60.0;
    let mut over_for = 0.0;

    while over_for < 1.0 && host.time < MAX_DEMO_SECS {
        host.drive(&mut session);
        let output = session.frame(frame_dt);
        host.time += frame_dt;
        host.observe(&output.events);

        for event in &output.events {
            log::debug!("{:.2}s {:?}", session.state().time_secs(), event);
        }
        for cue in &output.sounds {
            log::trace!("sound {:?} on {:?}", cue.effect, cue.target);
        }

        if session.state().phase == GamePhase::MatchOver {
            over_for += frame_dt;
        }
    }

    if let Some(hud) = session.hud() {
        println!("{}", serde_json::to_string(&hud)?);
        println!("{}", hud.score_label());
    }
    Ok(())
}
