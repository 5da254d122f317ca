//! Random-walk reading generator for simulated fences.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;

/// Seed profile for one simulated fence.
pub struct FenceProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub current: f64,
    pub voltage: f64,
}

/// Fence sites of the simulated district grid.
pub static PROFILES: [FenceProfile; 10] = [
    FenceProfile { id: "KSEB001", name: "Thiruvananthapuram Central", current: 11.2, voltage: 8.5 },
    FenceProfile { id: "KSEB002", name: "Kochi Industrial Zone", current: 14.7, voltage: 8.3 },
    FenceProfile { id: "KSEB003", name: "Kozhikode Beach Road", current: 9.8, voltage: 8.7 },
    FenceProfile { id: "KSEB004", name: "Thrissur Cultural Center", current: 12.9, voltage: 8.4 },
    FenceProfile { id: "KSEB005", name: "Kollam Port Authority", current: 10.5, voltage: 8.6 },
    FenceProfile { id: "KSEB006", name: "Palakkad Railway Junction", current: 13.2, voltage: 8.2 },
    FenceProfile { id: "KSEB007", name: "Malappuram Govt Complex", current: 8.7, voltage: 8.8 },
    FenceProfile { id: "KSEB008", name: "Kannur Airport Perimeter", current: 11.8, voltage: 8.4 },
    FenceProfile { id: "KSEB009", name: "Wayanad Tourist Center", current: 7.9, voltage: 8.9 },
    FenceProfile { id: "KSEB010", name: "Idukki Dam Security", current: 12.4, voltage: 8.3 },
];

/// Live state of one simulated fence.
pub struct SimulatedFence {
    pub profile: &'static FenceProfile,
    current: f64,
    voltage: f64,
}

impl SimulatedFence {
    pub fn new(profile: &'static FenceProfile) -> Self {
        Self {
            profile,
            current: profile.current,
            voltage: profile.voltage,
        }
    }

    /// An hour of per-minute history ending now, jittered around the profile.
    pub fn history(&self, rng: &mut StdRng, minutes: usize) -> Vec<(f64, f64, DateTime<Utc>)> {
        let now = Utc::now();
        (0..minutes)
            .map(|i| {
                let current = self.profile.current + (rng.gen::<f64>() - 0.5) * 2.0;
                let voltage = self.profile.voltage + (rng.gen::<f64>() - 0.5) * 0.5;
                let ts = now - Duration::minutes((minutes - i) as i64);
                (current, voltage, ts)
            })
            .collect()
    }

    /// Advance one tick. With probability `fault_rate` the reading is a
    /// surge or a sag instead of a small drift; faults do not persist.
    pub fn tick(&mut self, rng: &mut StdRng, fault_rate: f64) -> (f64, f64) {
        self.current = (self.current + (rng.gen::<f64>() - 0.5) * 0.2).max(0.0);
        self.voltage = (self.voltage + (rng.gen::<f64>() - 0.5) * 0.1).clamp(0.0, 10.0);

        if rng.gen_bool(fault_rate) {
            let reading = if rng.gen_bool(0.5) {
                self.current + rng.gen_range(4.0..8.0)
            } else {
                self.current * rng.gen_range(0.2..0.5)
            };
            return (reading, self.voltage);
        }
        (self.current, self.voltage)
    }
}
