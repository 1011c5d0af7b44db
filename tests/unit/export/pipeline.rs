use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::{
    export::sink::InMemorySink,
    foundation::core::Size,
    layer::{FnLayer, SolidLayer},
};

fn ramp_comp(duration: f64) -> Composition {
    let mut comp = Composition::new(Size::new(4, 2), duration);
    comp.add_layer(FnLayer::new(|t: f64| {
        let r = (t * 10.0).round().min(255.0) as u8;
        Ok(Some(Arc::new(Frame::filled(4, 2, [r, 0, 0, 255]))))
    }))
    .unwrap();
    comp
}

#[test]
fn frame_times_sample_half_open_range() {
    let times = frame_times(&ExportOpts::with_fps(4.0), 1.0).unwrap();
    assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75]);

    let opts = ExportOpts::with_fps(2.0).with_range(1.0, Some(2.5));
    assert_eq!(frame_times(&opts, 10.0).unwrap(), vec![1.0, 1.5, 2.0]);
}

#[test]
fn frame_times_reject_bad_options() {
    assert!(frame_times(&ExportOpts::with_fps(0.0), 1.0).is_err());
    assert!(frame_times(&ExportOpts::with_fps(f64::NAN), 1.0).is_err());
    let empty = ExportOpts::with_fps(30.0).with_range(2.0, Some(2.0));
    assert!(frame_times(&empty, 5.0).is_err());
    assert!(frame_times(&ExportOpts::default(), f64::INFINITY).is_err());
}

#[test]
fn export_pushes_frames_in_order_and_clears_cache() {
    let mut comp = ramp_comp(1.0);
    let mut sink = InMemorySink::new();
    let stats = export(&mut comp, &ExportOpts::with_fps(5.0), &mut sink).unwrap();

    assert_eq!(stats.frames, 5);
    assert_eq!(stats.cache_misses, 5);
    assert!(sink.is_ended());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 4,
            height: 2,
            fps: 5.0
        })
    );
    let indices: Vec<u64> = sink.frames().iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    let reds: Vec<u8> = sink
        .frames()
        .iter()
        .map(|f| f.frame.pixel(0, 0).unwrap()[0])
        .collect();
    assert_eq!(reds, vec![0, 2, 4, 6, 8]);
    assert_eq!(comp.cache_len(), 0);
}

#[test]
fn static_export_hits_the_cache() {
    let mut comp = Composition::new(Size::new(2, 2), 1.0);
    comp.add_layer(SolidLayer::new(Size::new(2, 2), [9, 9, 9, 255]))
        .unwrap();
    let mut sink = InMemorySink::new();
    let stats = export(&mut comp, &ExportOpts::with_fps(10.0), &mut sink).unwrap();
    assert_eq!(stats.frames, 10);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 9);
}

#[test]
fn failed_export_still_clears_cache() {
    let mut comp = Composition::new(Size::new(2, 2), 1.0);
    comp.add_layer(SolidLayer::new(Size::new(2, 2), [1, 1, 1, 255]))
        .unwrap();
    comp.add_layer(FnLayer::new(|t: f64| {
        if t > 0.5 {
            Err(StrataError::evaluation("boom"))
        } else {
            Ok(None)
        }
    }))
    .unwrap();
    let mut sink = InMemorySink::new();
    assert!(export(&mut comp, &ExportOpts::with_fps(4.0), &mut sink).is_err());
    assert_eq!(comp.cache_len(), 0);
    assert!(!sink.is_ended());
}

#[test]
fn parallel_render_matches_sequential_order() {
    let opts = ExportOpts::with_fps(10.0);
    let par = ParallelOpts {
        chunk_size: 3,
        threads: Some(2),
    };
    let frames = render_frames_parallel(|| Ok(ramp_comp(2.0)), &opts, &par).unwrap();
    assert_eq!(frames.len(), 20);

    let mut seq = ramp_comp(2.0);
    for (i, frame) in frames.iter().enumerate() {
        let expected = seq.render(i as f64 / 10.0).unwrap();
        assert_eq!(frame.data, expected.data, "frame {i}");
    }
}

#[test]
fn parallel_builds_one_composition_per_chunk() {
    let built = AtomicUsize::new(0);
    let par = ParallelOpts {
        chunk_size: 4,
        threads: Some(3),
    };
    let frames = render_frames_parallel(
        || {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(ramp_comp(1.0))
        },
        &ExportOpts::with_fps(10.0),
        &par,
    )
    .unwrap();
    assert_eq!(frames.len(), 10);
    // one probe plus ceil(10 / 4) chunks
    assert_eq!(built.load(Ordering::SeqCst), 4);
}

#[test]
fn parallel_export_feeds_sink_in_order() {
    let par = ParallelOpts {
        chunk_size: 2,
        threads: Some(2),
    };
    let mut sink = InMemorySink::new();
    let stats = export_parallel(
        || Ok(ramp_comp(1.0)),
        &ExportOpts::with_fps(10.0),
        &par,
        &mut sink,
    )
    .unwrap();
    assert_eq!(stats.frames, 10);
    assert!(sink.is_ended());
    for (i, captured) in sink.frames().iter().enumerate() {
        assert_eq!(captured.index, i as u64);
        assert_eq!(captured.frame.pixel(0, 0).unwrap()[0], i as u8);
    }
}

#[test]
fn parallel_rejects_zero_threads_and_propagates_factory_errors() {
    let par = ParallelOpts {
        chunk_size: 1,
        threads: Some(0),
    };
    assert!(render_frames_parallel(|| Ok(ramp_comp(1.0)), &ExportOpts::default(), &par).is_err());

    let err = render_frames_parallel(
        || Err(StrataError::evaluation("no scene")),
        &ExportOpts::default(),
        &ParallelOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, StrataError::Evaluation(_)));
}

#[test]
fn parallel_export_sums_chunk_cache_stats() {
    let factory = || -> StrataResult<Composition> {
        let mut comp = Composition::new(Size::new(2, 2), 1.0);
        comp.add_layer(SolidLayer::new(Size::new(2, 2), [3, 3, 3, 255]))?;
        Ok(comp)
    };
    let par = ParallelOpts {
        chunk_size: 5,
        threads: Some(2),
    };
    let mut sink = InMemorySink::new();
    let stats = export_parallel(factory, &ExportOpts::with_fps(10.0), &par, &mut sink).unwrap();
    // two chunks of five frames, each missing once then hitting its own cache
    assert_eq!(stats.frames, 10);
    assert_eq!(stats.cache_misses, 2);
    assert_eq!(stats.cache_hits, 8);
}
