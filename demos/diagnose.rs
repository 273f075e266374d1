//! Dump every discovered device: identity, role, capabilities, axis ranges.

use evstick::codes::abs_axis_name;
use evstick::Manager;

fn main() {
    env_logger::init();

    let (mgr, report) = Manager::discover();
    println!("scan: {} registered, {} unclassified", report.registered, report.unclassified);
    for (path, err) in &report.skipped {
        println!("skipped {}: {err}", path.display());
    }

    for (_, dev) in mgr.devices() {
        let meta = serde_json::to_string(dev.meta()).unwrap_or_default();
        println!("== {:?} {} ==", dev.role(), dev.path().display());
        println!("  meta: {meta}");

        let caps = dev.capabilities();
        println!(
            "  keys={} rel={} abs={}",
            caps.keys.len(),
            caps.relative.len(),
            caps.absolute.len()
        );

        let mut axes: Vec<u16> = caps.absolute.iter().collect();
        axes.sort_unstable();
        for code in axes {
            if let Some(range) = dev.abs_range(code) {
                let deadzone = if range.maximum != 0 {
                    range.flat as f32 * 100.0 / range.maximum as f32
                } else {
                    0.0
                };
                println!(
                    "  axis {code:#04x} ({}) min={} max={} value={} res={} deadzone={deadzone:.2}%",
                    abs_axis_name(code),
                    range.minimum,
                    range.maximum,
                    range.value,
                    range.resolution,
                );
            }
        }
    }
}
