// tests/bucketing_sample.rs
use chrono::NaiveDate;
use delivery_time_aggregator::{
    dense_sequence, moving_average, window_bounds, AggregateError, Bucket, Event, TimeUnit,
};

fn sample() -> Vec<Event> {
    vec![
        Event::new("2018-12-26 18:11:08.509654", 20),
        Event::new("2018-12-26 18:15:19.903159", 31),
        Event::new("2018-12-26 18:23:19.903159", 54),
    ]
}

#[test]
fn sample_log_buckets_and_averages() {
    let seq = dense_sequence(&sample(), TimeUnit::minute()).unwrap();
    assert_eq!(seq.len(), 14);

    let totals: Vec<f64> = seq.buckets().iter().map(|b| b.total).collect();
    assert_eq!(
        totals,
        vec![0.0, 20.0, 0.0, 0.0, 0.0, 31.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 54.0]
    );
    let counts: Vec<u64> = seq.buckets().iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1]);

    let avg = moving_average(seq.buckets(), 10).unwrap();
    assert_eq!(
        avg,
        vec![0.0, 20.0, 20.0, 20.0, 20.0, 25.5, 25.5, 25.5, 25.5, 25.5, 25.5, 31.0, 31.0, 42.5]
    );
}

#[test]
fn sample_log_bounds() {
    let b = window_bounds(&sample(), TimeUnit::minute()).unwrap();
    let day = NaiveDate::from_ymd_opt(2018, 12, 26).unwrap();
    assert_eq!(b.start, day.and_hms_opt(18, 11, 0).unwrap());
    assert_eq!(b.end, day.and_hms_opt(18, 24, 0).unwrap());
}

#[test]
fn empty_inputs_and_bad_window() {
    assert_eq!(
        dense_sequence(&[], TimeUnit::minute()).unwrap_err(),
        AggregateError::EmptyInput
    );
    assert_eq!(
        moving_average(&[], 3).unwrap_err(),
        AggregateError::EmptyDataset
    );
    assert_eq!(
        moving_average(&[Bucket::new(1.0, 1)], 0).unwrap_err(),
        AggregateError::InvalidWindowSize { window_size: 0 }
    );
}

#[test]
fn event_on_unit_boundary_goes_to_next_unit() {
    let evs = vec![
        Event::new("2018-12-26 18:11:00.000000", 7),
        Event::new("2018-12-26 18:12:00.000000", 9),
    ];
    let seq = dense_sequence(&evs, TimeUnit::minute()).unwrap();
    // 18:11 (empty), 18:12 (first event), 18:13 (second event)
    assert_eq!(
        seq.buckets(),
        &[Bucket::new(0.0, 0), Bucket::new(7.0, 1), Bucket::new(9.0, 1)]
    );
}

#[test]
fn timestamp_without_microseconds_is_not_bucketed() {
    let err = dense_sequence(&[Event::new("2018-12-26 18:11:08", 3)], TimeUnit::minute())
        .unwrap_err();
    assert_eq!(
        err,
        AggregateError::MalformedTimestamp {
            timestamp: "2018-12-26 18:11:08".into(),
            expected_format: "%Y-%m-%d %H:%M:%S.%6f",
        }
    );
}

#[test]
fn malformed_timestamp_anywhere_aborts() {
    for idx in 0..3 {
        let mut evs = sample();
        evs[idx].timestamp = "26-12-2018 18:11:08.509654".into();
        match dense_sequence(&evs, TimeUnit::minute()) {
            Err(AggregateError::MalformedTimestamp {
                timestamp,
                expected_format,
            }) => {
                assert_eq!(timestamp, "26-12-2018 18:11:08.509654");
                assert_eq!(expected_format, "%Y-%m-%d %H:%M:%S.%6f");
            }
            other => panic!("expected MalformedTimestamp at index {idx}, got {other:?}"),
        }
    }
}
