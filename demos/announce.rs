//! Build a stream collection, publish it, and watch member updates
//!
//! Run with:
//! ```sh
//! RUST_LOG=debug cargo run --example announce -- tags
//! ```
//!
//! The optional argument names the attribute to watch (`caps`, `tags`,
//! `stream-flags`, `stream-type`).

use std::sync::Arc;

use bytes::Bytes;
use stream_collection::{
    Caps, Event, Message, Stream, StreamCollection, StreamFlags, StreamProperty, StreamType,
    TagList,
};
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stream_collection=debug".parse()?)
                .add_directive("announce=debug".parse()?),
        )
        .init();

    let audio = Stream::new(
        Some("demux0/audio_0"),
        Some(
            Caps::new("audio/mpeg")
                .field("mpegversion", "4")
                .codec_data(Bytes::from_static(&[0x12, 0x10])),
        ),
        StreamType::Audio,
        StreamFlags::SELECT,
    );
    let video = Stream::new(
        Some("demux0/video_0"),
        Some(Caps::new("video/x-h264").field("height", "720")),
        StreamType::Video,
        StreamFlags::SELECT,
    );
    let video_hd = Stream::new(
        Some("demux0/video_0/1080p"),
        Some(Caps::new("video/x-h264").field("height", "1080")),
        StreamType::Video,
        StreamFlags::NONE,
    );

    let mut collection = StreamCollection::new(Some("demux0"));
    collection.add_stream(Arc::clone(&audio));
    collection.add_stream(Arc::clone(&video));
    collection.add_variant(video.stream_id(), video_hd)?;

    let watched = match std::env::args().nth(1) {
        Some(name) => StreamProperty::from_name(&name)
            .ok_or_else(|| format!("Unknown stream attribute: {}", name))?,
        None => StreamProperty::Tags,
    };
    let mut updates = collection.subscribe_property(watched);
    collection.connect_stream_notify(Some(watched), |stream, property| {
        println!("(sync) {} updated {}", stream.stream_id(), property);
    });
    let collection = Arc::new(collection);

    // Downstream consumers receive the announcement
    let (events_tx, mut events_rx) = broadcast::channel::<Event>(8);
    events_tx.send(Event::stream_collection(Arc::clone(&collection)))?;

    let event = events_rx.recv().await?;
    if let Some(announced) = event.parse_stream_collection() {
        println!("Collection from {:?}:", announced.upstream_id());
        for stream in announced.iter() {
            println!("  {} caps={:?}", stream, stream.caps().map(|c| c.to_string()));
            if let Ok(variants) = announced.get_variants(stream.stream_id()) {
                for variant in variants {
                    println!("    variant {}", variant.stream_id());
                }
            }
        }

        let selected: Vec<String> = announced
            .iter()
            .filter(|s| s.flags().contains(StreamFlags::SELECT))
            .map(|s| s.stream_id().to_owned())
            .collect();
        if let Some(select) = Event::select_streams(selected) {
            let mut message = Message::streams_selected(Arc::clone(announced));
            for id in select.parse_select_streams().unwrap_or_default() {
                if let Some(stream) = announced.find_stream(id) {
                    message.add_stream(Arc::clone(stream));
                }
            }
            println!("Selected {} streams", message.streams().len());
        }
    }

    let mut start = Event::stream_start(audio.stream_id());
    start.set_stream(Arc::clone(&audio));
    if let Some(stream) = start.parse_stream() {
        println!("Stream start: {}", stream);
    }

    match watched {
        StreamProperty::Caps => audio.set_caps(Some(Caps::new("audio/x-opus"))),
        StreamProperty::Tags => audio.set_tags(Some(TagList::new().with("language-code", "en"))),
        StreamProperty::StreamFlags => audio.set_flags(StreamFlags::UNSELECT),
        StreamProperty::StreamType => audio.set_stream_type(StreamType::Unknown),
    }
    let update = updates.recv().await?;
    println!("{} updated {}", update.stream.stream_id(), update.property);

    Ok(())
}
