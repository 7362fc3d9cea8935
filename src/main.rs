use hs_flow::image::ImageU8;
use hs_flow::{FlowEstimator, SolverParams};

fn main() {
    env_logger::init();

    // Demo stub: a bright square moving one pixel to the right.
    let (w, h) = (96usize, 64usize);
    let frame = |offset: usize| {
        let mut buf = vec![32u8; w * h];
        for y in 16..40 {
            for x in 24 + offset..56 + offset {
                buf[y * w + x] = 220;
            }
        }
        buf
    };
    let (a, b) = (frame(0), frame(1));
    let first = ImageU8 {
        w,
        h,
        stride: w,
        data: &a,
    };
    let second = ImageU8 {
        w,
        h,
        stride: w,
        data: &b,
    };

    let estimator = FlowEstimator::new(SolverParams::new(200).with_workers(4));
    match estimator.estimate(first, second) {
        Ok(estimate) => {
            let r = &estimate.report;
            println!(
                "mean_u={:.4} mean_v={:.4} needles={} total_ms={:.3}",
                r.stats.mean_u, r.stats.mean_v, r.needles, r.timings.total_ms
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
