use clusterlist::{ClusterListOptions, Level, LogRecord};
use clusterlist_adapter::{HeadlessHost, MemorySurface};

fn main() {
    // Example: a 10k-line log viewer driven by virtual time.
    //
    // A real adapter would:
    // - forward user scrolls to scroll_to(offset, now_ms)
    // - call tick(now_ms) every frame and apply the returned offset to its scroll container
    // - render the nodes of MemorySurface (or implement RenderSurface itself)
    let records: Vec<LogRecord> = (0..10_000u64)
        .map(|i| {
            let level = match i % 10 {
                0 => Level::Error,
                1 | 2 => Level::Warn,
                _ => Level::Info,
            };
            LogRecord::new(1_700_000_000_000 - i * 1_000, level, format!("event #{i}"))
        })
        .collect();

    let mut host = HeadlessHost::new(
        ClusterListOptions::default(),
        records,
        MemorySurface::with_uniform_rows(600, 20),
    );
    host.init(0);
    print_status(&host, "init");

    let mut now_ms = 0u64;
    for offset in [10_000u64, 20_000, 30_000] {
        now_ms += 500;
        host.scroll_to(offset, now_ms);
        now_ms += 200;
        host.tick(now_ms);
        print_status(&host, "scroll");
    }

    host.input_mut().set_text("7321");
    if let Err(err) = host.key_press("Enter", now_ms) {
        println!("jump failed: {err}");
    }
    while host.list().is_navigating() {
        now_ms += 16;
        if let Some(off) = host.tick(now_ms) {
            if now_ms % 80 == 0 {
                println!("t={now_ms} off={off}");
            }
        }
    }
    now_ms += 200;
    host.tick(now_ms);
    print_status(&host, "jump");

    host.input_mut().set_text("12000");
    if host.submit_jump(now_ms).is_err() {
        println!("alert: {}", host.alert().unwrap_or_default());
    }

    println!("-- last diagnostics --");
    for d in host.list().diagnostics().iter().rev().take(8).rev() {
        println!("[{:>6}ms] {:?}: {}", d.at_ms, d.kind, d.message);
    }
}

fn print_status(host: &HeadlessHost<Vec<LogRecord>>, label: &str) {
    let status = host.list().status();
    println!(
        "{label}: offset={} visible={:?} loaded={:?} nodes={} records={:?}",
        host.scroll_offset(),
        status.visible_clusters,
        status.loaded_clusters,
        host.surface().node_count(),
        host.list().visible_record_range(),
    );
}
