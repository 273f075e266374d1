use evstick::{Manager, ROLES};

fn main() {
    env_logger::init();

    let (mut mgr, report) = Manager::discover();
    println!(
        "scan: {} registered, {} unclassified, {} skipped",
        report.registered,
        report.unclassified,
        report.skipped.len()
    );
    for (path, err) in &report.skipped {
        println!("  skipped {}: {err}", path.display());
    }
    for (_, dev) in mgr.devices() {
        println!("- {:?} {}", dev.role(), dev.meta().label());
    }

    loop {
        for note in mgr.poll() {
            println!("note: {note:?}");
        }

        for role in ROLES.into_iter().filter(|role| role.is_pollable()) {
            let snap = mgr.snapshot(role);
            for view in snap.iter() {
                let mut sections = Vec::new();

                let mut axes: Vec<u16> = view.axis_codes().collect();
                axes.sort_unstable();
                let axes_str: Vec<String> = axes
                    .iter()
                    .filter_map(|&code| {
                        let v = view.axis_normalized(code)?;
                        Some(format!("{}={v:.2}", evstick::codes::abs_axis_name(code)))
                    })
                    .collect();
                if !axes_str.is_empty() {
                    sections.push(axes_str.join(" "));
                }

                let (dx, dy) = view.motion();
                if (dx, dy) != (0, 0) {
                    sections.push(format!("motion=({dx},{dy})"));
                }

                let mut held: Vec<u16> = view.pressed_codes().collect();
                held.sort_unstable();
                if !held.is_empty() {
                    sections.push(format!("held={held:?}"));
                }

                if !sections.is_empty() {
                    println!("{:?} {}: {}", role, view.path().display(), sections.join(" "));
                }
            }
        }

        // Sleep a touch to avoid pegging the CPU in the demo
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}
