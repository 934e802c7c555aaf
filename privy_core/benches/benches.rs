use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use privy_core::{
    ChannelTracker, IrcMessage, ModeEvent, NetworkFeatures, PrivilegeTable,
    irc_message::AnySemantic,
};

const SESSION: &str = r":irc.example.net 001 privy :Welcome to the network
:irc.example.net 005 privy PREFIX=(qaohv)~&@%+ CHANMODES=beI,k,l,imnpst CASEMAPPING=rfc1459 :are supported by this server
:privy!privy@host JOIN #rust
:irc.example.net 353 privy = #rust :privy ~founder &admin @op %half +voice plain
:irc.example.net 366 privy #rust :End of /NAMES list.
:op!op@host MODE #rust +ov plain half
:op!op@host MODE #rust -v+b voice *!*@spam.example
@account=someone :someone!s@host PRIVMSG #rust :!privs plain
:newbie!n@host JOIN #rust
:op!op@host MODE #rust +vvv newbie plain half
:half!h@host NICK halfling
:founder!f@host KICK #rust newbie :bye
:admin!a@host PART #rust :later
:voice!v@host QUIT :gone
PING :irc.example.net
";

fn parse_mode_lines(c: &mut Criterion) {
    let features = NetworkFeatures::default();
    c.bench_function("Parse MODE changes", |b| {
        b.iter(|| {
            black_box(ModeEvent::parse(
                black_box("#rust"),
                black_box("+ov-h+bk-l"),
                black_box(["alice", "bob", "carol", "*!*@spam", "hunter2"]),
                &features,
            ))
        })
    });
}

fn apply_mode_events(c: &mut Criterion) {
    let features = NetworkFeatures::default();
    let events: Vec<ModeEvent> = (0..64)
        .map(|i| {
            let nick = format!("user{i}");
            ModeEvent::parse("#rust", "+ov-v", [nick.as_str(), nick.as_str(), nick.as_str()], &features)
        })
        .collect();

    c.bench_function("Apply MODE events to a table", |b| {
        b.iter(|| {
            let mut table = PrivilegeTable::new();
            for event in &events {
                table.apply_mode_event(black_box(event));
            }
            black_box(table.is_op("#rust", "user42"))
        })
    });
}

fn replay_session(c: &mut Criterion) {
    let lines: Vec<&str> = SESSION.lines().collect();
    c.bench_function("Replay a short session through the tracker", |b| {
        b.iter(|| {
            let mut tracker = ChannelTracker::new("privy", NetworkFeatures::default());
            for line in &lines {
                let msg = AnySemantic::from(IrcMessage::try_from(*line).unwrap());
                black_box(tracker.handle(&msg));
            }
            black_box(tracker.privileges().privileges_of("#rust", "plain"))
        })
    });
}

criterion_group!(benches, parse_mode_lines, apply_mode_events, replay_session);
criterion_main!(benches);
