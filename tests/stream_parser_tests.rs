use sumochat::api::stream::{PushParser, StreamParser};
use sumochat::types::{PushEvent, TodoStatus, WireEvent};

#[test]
fn test_fragmented_events() {
    let mut parser = StreamParser::new();

    let chunk1 = b"data: {\"type\":\"content\",\"section\":\"answer\",\"cont";
    let events1 = parser.process(chunk1).expect("first chunk parse");
    assert_eq!(events1.len(), 0);

    let chunk2 = b"ent\":\"Hello\"}\n\n";
    let events2 = parser.process(chunk2).expect("second chunk parse");
    assert_eq!(events2.len(), 1);
    match &events2[0] {
        WireEvent::Content { section, content } => {
            assert_eq!(section, "answer");
            assert_eq!(content, "Hello");
        }
        other => panic!("expected content event, got {other:?}"),
    }
}

#[test]
fn test_multiple_events_in_one_chunk() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {\"type\":\"section_start\",\"section\":\"think-1\"}\n\n\
                  data: {\"type\":\"content\",\"section\":\"think-1\",\"content\":\"hm\"}\n\n\
                  data: {\"type\":\"section_complete\",\"section\":\"think-1\"}\n\n";
    let events = parser.process(chunk).expect("batch parse");
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], WireEvent::SectionStart { section } if section == "think-1"));
    assert!(matches!(&events[2], WireEvent::SectionComplete { section } if section == "think-1"));
}

#[test]
fn test_malformed_frame_is_dropped_without_error() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {not json}\n\ndata: {\"type\":\"complete\"}\n\n";
    let events = parser
        .process(chunk)
        .expect("malformed frame must not fail the parser");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], WireEvent::Complete));
}

#[test]
fn test_unprefixed_lines_are_ignored() {
    let mut parser = StreamParser::new();

    let chunk = b": keep-alive comment\nretry: 3000\ndata: {\"type\":\"complete\"}\n\n";
    let events = parser.process(chunk).expect("frame with noise lines");
    assert_eq!(events.len(), 1);
}

#[test]
fn test_error_event_accepts_message_or_content_field() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {\"type\":\"error\",\"message\":\"backend busy\"}\n\n\
                  data: {\"type\":\"error\",\"content\":\"also accepted\"}\n\n";
    let events = parser.process(chunk).expect("error frames parse");
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], WireEvent::Error { message } if message == "backend busy"));
    assert!(matches!(&events[1], WireEvent::Error { message } if message == "also accepted"));
}

#[test]
fn test_flush_returns_unterminated_remainder() {
    let mut parser = StreamParser::new();
    let _ = parser.process(b"data: {\"type\":\"complete\"").expect("partial chunk");
    assert_eq!(parser.flush(), "data: {\"type\":\"complete\"");
}

#[test]
fn test_push_parser_decodes_named_events() {
    let mut parser = PushParser::new();

    let chunk = b"event: new_image\n\
                  data: {\"title\":\"Junction heatmap\",\"description\":\"peak hour\",\"image_path\":\"/out/junction.png\",\"timestamp\":12.5}\n\n\
                  event: todos_updated\n\
                  data: {\"todos\":[{\"id\":\"1\",\"content\":\"load network\",\"status\":\"in_progress\"}]}\n\n";
    let events = parser.process(chunk).expect("push frames parse");
    assert_eq!(events.len(), 2);

    match &events[0] {
        PushEvent::NewImage(notice) => {
            assert_eq!(notice.title, "Junction heatmap");
            assert_eq!(notice.image_path, "/out/junction.png");
        }
        other => panic!("expected image event, got {other:?}"),
    }
    match &events[1] {
        PushEvent::TodosUpdated(todos) => {
            assert_eq!(todos.len(), 1);
            assert_eq!(todos[0].id, "1");
            assert_eq!(todos[0].status, TodoStatus::InProgress);
        }
        other => panic!("expected todos event, got {other:?}"),
    }
}

#[test]
fn test_push_parser_skips_unknown_event_names() {
    let mut parser = PushParser::new();

    let chunk = b"event: heartbeat\ndata: {}\n\n\
                  event: todos_updated\ndata: {\"todos\":[]}\n\n";
    let events = parser.process(chunk).expect("push frames parse");
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], PushEvent::TodosUpdated(todos) if todos.is_empty()));
}

#[test]
fn test_push_frame_without_name_is_skipped() {
    let mut parser = PushParser::new();

    let chunk = b"data: {\"todos\":[]}\n\n";
    let events = parser.process(chunk).expect("unnamed frame");
    assert!(events.is_empty());
}
