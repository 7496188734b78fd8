#![no_main]

use libfuzzer_sys::fuzz_target;
use proto::ChannelId;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(channel) = ChannelId::parse(text) {
        // A parsed id canonicalizes to something that parses again.
        let canonical = channel.to_string();
        let reparsed = ChannelId::parse(&canonical).expect("canonical form must parse");
        assert_eq!(reparsed.namespace(), channel.namespace());
        assert_eq!(reparsed.path(), channel.path());
    }
});
