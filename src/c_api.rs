use std::ffi::{CStr, c_char};

use crate::{body::Body, config::SimulationConfig, simulation::Simulation};

fn into_handle(config: &SimulationConfig) -> *mut Simulation {
    match Simulation::setup(config) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(err) => {
            log::error!("rejected simulation config: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Builds a simulation from a NUL-terminated JSON configuration.
/// Returns null if the string is not valid UTF-8 or the config is rejected.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_CreateFromJson(json: *const c_char) -> *mut Simulation {
    if json.is_null() {
        return std::ptr::null_mut();
    }
    let json = unsafe { CStr::from_ptr(json) };
    let Ok(json) = json.to_str() else {
        log::error!("simulation config is not valid utf-8");
        return std::ptr::null_mut();
    };
    match SimulationConfig::from_json(json) {
        Ok(config) => into_handle(&config),
        Err(err) => {
            log::error!("rejected simulation config: {err}");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn Simulation_CreateLatticeDemo() -> *mut Simulation {
    into_handle(&SimulationConfig::lattice_demo())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Step(handle: *mut Simulation, dt: f32) -> usize {
    unsafe { handle.as_mut() }.map_or(0, |sim| sim.step(dt).collisions)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.bodies.len())
}

/// Pointer to `Simulation_GetBodyCount` contiguous bodies, valid until the next step.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodies(handle: *const Simulation) -> *const Body {
    unsafe { handle.as_ref() }.map_or(std::ptr::null(), |sim| sim.bodies.as_ptr())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetKineticEnergy(handle: *const Simulation) -> f32 {
    unsafe { handle.as_ref() }.map_or(0.0, |sim| sim.total_kinetic_energy())
}
