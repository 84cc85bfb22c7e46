//! End-to-end stream collection scenarios

use std::sync::Arc;
use std::time::Duration;

use stream_collection::{
    Caps, CollectionConfig, CollectionError, Event, Stream, StreamCollection, StreamFlags,
    StreamProperty, StreamType,
};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio_test::{assert_err, assert_ok};

fn stream(id: &str, stream_type: StreamType) -> Arc<Stream> {
    Stream::new(Some(id), None, stream_type, StreamFlags::NONE)
}

#[test]
fn test_audio_video_with_variants() {
    let mut c = StreamCollection::new(Some("upstream-1"));
    let a1 = stream("a1", StreamType::Audio);
    let a2 = stream("a2", StreamType::Audio);
    let v = stream("v", StreamType::Video);

    c.add_stream(Arc::clone(&a1));
    c.add_stream(Arc::clone(&a2));
    c.add_stream(Arc::clone(&v));
    assert_eq!(c.size(), 3);
    assert!(c.get_variants("v").unwrap().is_empty());

    let v1 = stream("v1", StreamType::Video);
    let v2 = stream("v2", StreamType::Video);
    assert_ok!(c.add_variant("v", Arc::clone(&v1)));
    assert_ok!(c.add_variant("v", Arc::clone(&v2)));
    assert_eq!(c.size(), 3);

    let variants = c.get_variants("v").unwrap();
    let ids: Vec<_> = variants.iter().map(|s| s.stream_id()).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
    assert_eq!(c.get_variant_of("v1"), Some("v"));
    assert_eq!(c.get_variant_of("a1"), None);

    // Audio variants cannot hang off a video stream
    let err = assert_err!(c.add_variant("v", stream("a3", StreamType::Audio)));
    assert!(matches!(err, CollectionError::TypeMismatch { .. }));
    assert_eq!(c.get_variants("v").unwrap().len(), 2);

    assert_eq!(c.upstream_id(), Some("upstream-1"));
}

#[tokio::test]
async fn test_caps_notification_scenario() {
    let mut c = StreamCollection::new(Some("upstream-1"));
    let a1 = stream("a1", StreamType::Audio);
    let v = stream("v", StreamType::Video);
    let v1 = stream("v1", StreamType::Video);
    c.add_stream(Arc::clone(&a1));
    c.add_stream(Arc::clone(&v));
    assert_ok!(c.add_variant("v", Arc::clone(&v1)));

    let mut rx = c.subscribe_property(StreamProperty::Caps);

    a1.set_caps(Some(Caps::new("audio/mpeg").field("mpegversion", "4")));
    v1.set_caps(Some(Caps::new("video/x-h264")));

    let n = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(&n.stream, &a1));
    assert_eq!(n.property.name(), "caps");
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn test_no_events_after_release() {
    let mut c = StreamCollection::new(None);
    let a1 = stream("a1", StreamType::Audio);
    c.add_stream(Arc::clone(&a1));

    let mut rx = c.subscribe();
    a1.set_flags(StreamFlags::SELECT);
    drop(c);
    a1.set_flags(StreamFlags::UNSELECT);

    // Pending notification is still delivered, then the channel closes
    assert_eq!(rx.recv().await.unwrap().property, StreamProperty::StreamFlags);
    assert_eq!(rx.recv().await.unwrap_err(), RecvError::Closed);
}

#[tokio::test]
async fn test_relay_from_other_thread() {
    let mut c = StreamCollection::with_config(None, CollectionConfig::new().notify_capacity(4));
    let t = stream("subs", StreamType::Text);
    c.add_stream(Arc::clone(&t));
    let mut rx = c.subscribe();

    let writer = std::thread::spawn(move || {
        t.set_flags(StreamFlags::SPARSE);
    });
    writer.join().unwrap();

    let n = rx.recv().await.unwrap();
    assert_eq!(n.stream.stream_id(), "subs");
    assert_eq!(n.stream.flags(), StreamFlags::SPARSE);
}

#[tokio::test]
async fn test_published_collection_is_read_only_shared() {
    let mut c = StreamCollection::new(Some("demux0"));
    c.add_stream(stream("audio", StreamType::Audio));
    c.add_stream(stream("video", StreamType::Video));
    assert_ok!(c.add_variant("video", stream("video-720p", StreamType::Video)));

    let event = Event::stream_collection(Arc::new(c));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let event = event.clone();
            tokio::spawn(async move {
                let c = event.parse_stream_collection().unwrap();
                (c.size(), c.get_variant_of("video-720p").map(str::to_owned))
            })
        })
        .collect();

    for handle in handles {
        let (size, parent) = handle.await.unwrap();
        assert_eq!(size, 2);
        assert_eq!(parent.as_deref(), Some("video"));
    }
}

#[test]
fn test_every_member_change_reaches_connected_handler() {
    let mut c = StreamCollection::new(Some("upstream-1"));
    let a1 = stream("a1", StreamType::Audio);
    let v = stream("v", StreamType::Video);
    let v1 = stream("v1", StreamType::Video);
    c.add_stream(Arc::clone(&a1));
    c.add_stream(Arc::clone(&v));
    assert_ok!(c.add_variant("v", Arc::clone(&v1)));

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    c.connect_stream_notify(Some(StreamProperty::StreamFlags), move |s, _| {
        sink.lock().unwrap().push(s.stream_id().to_owned());
    });

    for i in 0..100 {
        a1.set_flags(if i % 2 == 0 {
            StreamFlags::SELECT
        } else {
            StreamFlags::UNSELECT
        });
        // Variants stay silent
        v1.set_flags(if i % 2 == 0 {
            StreamFlags::SELECT
        } else {
            StreamFlags::UNSELECT
        });
    }
    v.set_caps(Some(Caps::new("video/x-h264")));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 100);
    assert!(seen.iter().all(|id| id == "a1"));
}
