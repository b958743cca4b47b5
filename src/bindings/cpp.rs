use crate::config::Config;
use crate::processing::acquisition::Sample;
use crate::processing::pipeline::PpgPipeline;

use std::os::raw::c_void;

pub struct PpgPipelineFFI {
    pipeline: PpgPipeline,
    fs: f64,
}

/// Returns null when the window parameters are rejected.
#[no_mangle]
pub extern "C" fn create_ppg_pipeline(capacity: usize, alternation_divisor: usize, fs: f64) -> *mut c_void {
    let mut config = Config::default();
    config.window.capacity = capacity;
    config.window.alternation_divisor = alternation_divisor;

    match PpgPipeline::new(config) {
        Ok(pipeline) => Box::into_raw(Box::new(PpgPipelineFFI { pipeline, fs })) as *mut c_void,
        Err(e) => {
            eprintln!("Failed to create PPG pipeline: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn delete_ppg_pipeline(pipeline_ptr: *mut c_void) {
    if !pipeline_ptr.is_null() {
        unsafe {
            drop(Box::from_raw(pipeline_ptr as *mut PpgPipelineFFI));
        }
    }
}

/// Feeds one raw sample and returns the gated output value (0.0 for a null
/// pipeline).
#[no_mangle]
pub extern "C" fn ppg_push_sample(pipeline_ptr: *mut c_void, value: f64) -> f64 {
    if pipeline_ptr.is_null() {
        return 0.0;
    }
    let ffi = unsafe { &mut *(pipeline_ptr as *mut PpgPipelineFFI) };
    let timestamp = ffi.pipeline.frame_index() as f64 / ffi.fs;
    ffi.pipeline
        .push_sample(Sample { timestamp, value })
        .current_value
}

#[no_mangle]
pub extern "C" fn ppg_push_chunk(
    pipeline_ptr: *mut c_void,
    data: *const f64,
    output: *mut f64,
    length: usize,
) -> bool {
    if pipeline_ptr.is_null() || data.is_null() || output.is_null() {
        return false;
    }
    let input = unsafe { std::slice::from_raw_parts(data, length) };
    let output = unsafe { std::slice::from_raw_parts_mut(output, length) };

    for (out, &value) in output.iter_mut().zip(input) {
        *out = ppg_push_sample(pipeline_ptr, value);
    }
    true
}

#[no_mangle]
pub extern "C" fn ppg_is_signal_present(pipeline_ptr: *const c_void) -> bool {
    if pipeline_ptr.is_null() {
        return false;
    }
    let ffi = unsafe { &*(pipeline_ptr as *const PpgPipelineFFI) };
    ffi.pipeline.state().is_signal_present
}

#[no_mangle]
pub extern "C" fn ppg_reset(pipeline_ptr: *mut c_void) {
    if pipeline_ptr.is_null() {
        return;
    }
    let ffi = unsafe { &mut *(pipeline_ptr as *mut PpgPipelineFFI) };
    ffi.pipeline.reset();
}
