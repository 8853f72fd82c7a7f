use std::collections::VecDeque;

use mustang_usb::error::{CommandError, ConnectError};
use mustang_usb::packet::{
    serialise_amp_settings, serialise_amp_settings_usb_gain, serialise_apply_command,
    serialise_clear_effect_settings, serialise_effect_settings, serialise_init_command,
    serialise_load_command, serialise_load_slot_command, serialise_name,
    serialise_save_effect_name, serialise_save_effect_packets, Packet, PACKET_SIZE,
};
use mustang_usb::rusb;
use mustang_usb::types::{AmpModel, AmpSettings, EffectSettings, EffectType, MemoryBank, NoiseGate};
use mustang_usb::{
    AmpTransport, Mustang, SessionConfig, SessionState, ENDPOINT_RECEIVE, ENDPOINT_SEND,
    PRODUCT_IDS, VID_MUSTANG,
};

type Reply = Result<Vec<u8>, rusb::Error>;

/// Plays back scripted replies and records everything written. Once the script runs out every
/// read is zero-length.
struct ScriptedTransport {
    present: bool,
    open: bool,
    closes: usize,
    written: Vec<Vec<u8>>,
    replies: VecDeque<Reply>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            present: true,
            open: false,
            closes: 0,
            written: Vec::new(),
            replies: replies.into(),
        }
    }

    fn absent() -> Self {
        Self {
            present: false,
            ..Self::new(vec![])
        }
    }
}

impl AmpTransport for ScriptedTransport {
    fn open(&mut self, vendor_id: u16, product_ids: &[u16]) -> Result<(), ConnectError> {
        assert_eq!(vendor_id, VID_MUSTANG);
        assert_eq!(product_ids, PRODUCT_IDS);
        if !self.present {
            return Err(ConnectError::DeviceNotFound);
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.closes += 1;
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn interrupt_write(&mut self, endpoint: u8, data: &[u8]) -> Result<usize, CommandError> {
        assert_eq!(endpoint, ENDPOINT_SEND);
        self.written.push(data.to_vec());
        Ok(data.len())
    }

    fn interrupt_read(&mut self, endpoint: u8, length: usize) -> Result<Vec<u8>, CommandError> {
        assert_eq!(endpoint, ENDPOINT_RECEIVE);
        assert_eq!(length, PACKET_SIZE);
        match self.replies.pop_front() {
            Some(reply) => Ok(reply?),
            None => Ok(Vec::new()),
        }
    }
}

fn ack() -> Reply {
    Ok(vec![0; PACKET_SIZE])
}

fn blank() -> Packet {
    [0; PACKET_SIZE]
}

fn named(name: &str) -> Packet {
    serialise_name(0, name)
}

/// Handshake acknowledgements followed by the given load reply and its terminator.
fn startup(packets: &[Packet]) -> Vec<Reply> {
    let mut replies = vec![ack(), ack()];
    replies.extend(packets.iter().map(|p| Ok(p.to_vec())));
    replies.push(Ok(Vec::new()));
    replies
}

fn directory(count: usize) -> Vec<Packet> {
    (0..count)
        .map(|index| match index % 2 {
            0 => named(&format!("Preset {}", index / 2)),
            _ => blank(),
        })
        .collect()
}

fn preset_window() -> Vec<Packet> {
    let amp = AmpSettings {
        model: AmpModel::British70s,
        volume: 0x50,
        gain: 0x90,
        noise_gate: NoiseGate::Medium,
        depth: 0x80,
        usb_gain: 0x20,
        ..Default::default()
    };
    let delay = EffectSettings {
        slot: 2,
        effect: EffectType::MonoDelay,
        knobs: [0x10, 0x20, 0x30, 0x40, 0x50, 0x00],
        post_amp: true,
    };

    vec![
        named("Current"),
        serialise_amp_settings(&amp),
        serialise_effect_settings(&delay),
        blank(),
        blank(),
        blank(),
        serialise_amp_settings_usb_gain(&amp),
    ]
}

fn session(replies: Vec<Reply>) -> Mustang<ScriptedTransport> {
    Mustang::with_transport(ScriptedTransport::new(replies), SessionConfig::default())
}

/// A session that has completed `start` against a small directory, with the write log cleared.
fn started() -> Mustang<ScriptedTransport> {
    let mut packets = directory(48);
    packets.extend(preset_window());

    let mut mustang = session(startup(&packets));
    mustang.start().expect("start");
    mustang.transport_mut().written.clear();
    mustang
}

fn queue(mustang: &mut Mustang<ScriptedTransport>, replies: Vec<Reply>) {
    mustang.transport_mut().replies.extend(replies);
}

#[test]
fn start_sends_handshake_then_load() {
    let mut packets = directory(48);
    packets.extend(preset_window());
    let mut mustang = session(startup(&packets));

    let state = mustang.start().expect("start");
    assert_eq!(mustang.state(), SessionState::Connected);

    let [first, second] = serialise_init_command();
    let written = &mustang.transport().written;
    assert_eq!(written.len(), 3);
    assert_eq!(written[0], first.to_vec());
    assert_eq!(written[1], second.to_vec());
    assert_eq!(written[2], serialise_load_command().to_vec());

    assert_eq!(mustang.preset_slots(), 24);
    assert_eq!(state.presets.len(), 24);
    assert_eq!(state.presets[0], "Preset 0");
    assert_eq!(state.presets[23], "Preset 23");

    assert_eq!(state.current.name, "Current");
    assert_eq!(state.current.amp.model, AmpModel::British70s);
    assert_eq!(state.current.amp.gain, 0x90);
    assert_eq!(state.current.amp.usb_gain, 0x20);
    assert_eq!(state.current.effects[2].effect, EffectType::MonoDelay);
    assert!(state.current.effects[2].post_amp);
    assert_eq!(state.current.active_effects().count(), 1);
}

#[test]
fn stop_is_idempotent() {
    let mut mustang = session(vec![]);
    mustang.stop();
    mustang.stop();
    assert_eq!(mustang.state(), SessionState::Disconnected);
    assert_eq!(mustang.transport().closes, 0);

    let mut mustang = started();
    mustang.stop();
    mustang.stop();
    assert_eq!(mustang.state(), SessionState::Disconnected);
    assert_eq!(mustang.transport().closes, 1);
    assert!(!mustang.transport().is_open());
}

#[test]
fn empty_reply_yields_default_bank() {
    let mut mustang = session(startup(&[]));
    let state = mustang.start().expect("start");

    assert_eq!(state.current, MemoryBank::default());
    assert_eq!(state.presets, vec![String::new(); 24]);
    assert_eq!(mustang.preset_slots(), 24);
}

#[test]
fn directory_size_cutoff() {
    let mut mustang = session(startup(&directory(143)));
    mustang.start().expect("start");
    assert_eq!(mustang.preset_slots(), 24);

    let mut mustang = session(startup(&directory(144)));
    mustang.start().expect("start");
    assert_eq!(mustang.preset_slots(), 100);
}

#[test]
fn large_directory() {
    let mut packets = directory(200);
    packets.extend(preset_window());
    assert_eq!(packets.len(), 207);

    let mut mustang = session(startup(&packets));
    let state = mustang.start().expect("start");

    assert_eq!(state.presets.len(), 100);
    assert_eq!(state.presets[99], "Preset 99");
    assert_eq!(state.current.name, "Current");
    assert_eq!(state.current.amp.model, AmpModel::British70s);
}

#[test]
fn partial_preset_window_is_padded() {
    let mut packets = directory(48);
    packets.extend(preset_window().into_iter().take(2));

    let mut mustang = session(startup(&packets));
    let state = mustang.start().expect("start");

    assert_eq!(state.current.name, "Current");
    assert_eq!(state.current.amp.model, AmpModel::British70s);
    assert_eq!(state.current.amp.usb_gain, 0);
    assert_eq!(state.current.active_effects().count(), 0);
}

#[test]
fn silent_device_is_a_transport_error() {
    let mut mustang = session(vec![Err(rusb::Error::Timeout)]);
    let error = mustang.start().expect_err("start should fail");

    assert!(matches!(
        error,
        ConnectError::Command(CommandError::UsbError(rusb::Error::Timeout))
    ));
    assert_eq!(error.code(), -7);
    assert_eq!(mustang.state(), SessionState::Disconnected);
    assert!(!mustang.transport().is_open());
}

#[test]
fn timeout_mid_reply_ends_it() {
    let mut replies = vec![ack(), ack()];
    replies.extend(directory(60).iter().map(|p| Ok(p.to_vec())));
    replies.push(Err(rusb::Error::Timeout));

    let mut mustang = session(replies);
    let state = mustang.start().expect("start");
    assert_eq!(state.presets[1], "Preset 1");
    assert_eq!(mustang.preset_slots(), 24);
}

#[test]
fn missing_device() {
    let mut mustang = Mustang::with_transport(ScriptedTransport::absent(), SessionConfig::default());
    let error = mustang.start().expect_err("start should fail");

    assert!(error.is_device_not_found());
    assert_eq!(error.code(), -100);
    assert_eq!(mustang.state(), SessionState::Disconnected);
}

#[test]
fn endless_reply_overflows() {
    let config = SessionConfig {
        max_response_packets: 10,
        ..Default::default()
    };
    let mut replies = vec![ack(), ack()];
    replies.extend((0..20).map(|_| ack()));

    let mut mustang = Mustang::with_transport(ScriptedTransport::new(replies), config);
    let error = mustang.start().expect_err("start should fail");

    assert!(matches!(
        error,
        ConnectError::Command(CommandError::ResponseOverflow(10))
    ));
    assert_eq!(error.code(), -8);
}

#[test]
fn reply_at_the_limit_is_accepted() {
    let config = SessionConfig {
        max_response_packets: 10,
        ..Default::default()
    };
    let mut mustang =
        Mustang::with_transport(ScriptedTransport::new(startup(&directory(10))), config);
    assert!(mustang.start().is_ok());
}

#[test]
fn commands_need_a_connection() {
    let mut mustang = session(vec![]);

    let error = mustang.set_amplifier(&AmpSettings::default()).unwrap_err();
    assert!(matches!(error, CommandError::NotConnected));
    assert_eq!(error.code(), -4);

    assert!(matches!(
        mustang.set_effect(&EffectSettings::empty(0)),
        Err(CommandError::NotConnected)
    ));
    assert!(matches!(
        mustang.load_memory_bank(0),
        Err(CommandError::NotConnected)
    ));
    assert!(mustang.transport().written.is_empty());
}

#[test]
fn clearing_an_effect() {
    let mut mustang = started();
    mustang.set_effect(&EffectSettings::empty(1)).expect("set effect");

    assert_eq!(
        mustang.transport().written,
        [
            serialise_clear_effect_settings().to_vec(),
            serialise_apply_command(None).to_vec(),
        ]
    );
}

#[test]
fn setting_an_effect_normalises_knobs() {
    let mut mustang = started();
    let effect = EffectSettings {
        slot: 0,
        effect: EffectType::SimpleComp,
        knobs: [0x10, 0x20, 0, 0, 0, 0],
        post_amp: false,
    };
    mustang.set_effect(&effect).expect("set effect");

    let written = &mustang.transport().written;
    assert_eq!(written.len(), 4);
    assert_eq!(written[0], serialise_clear_effect_settings().to_vec());
    assert_eq!(written[1], serialise_apply_command(None).to_vec());
    assert_eq!(written[2], serialise_effect_settings(&effect.normalised()).to_vec());
    assert_eq!(written[2][32..38], [0x03, 0, 0, 0, 0, 0]);
    assert_eq!(written[3], serialise_apply_command(None).to_vec());
}

#[test]
fn setting_the_amplifier_takes_two_commits() {
    let mut mustang = started();
    let settings = AmpSettings {
        model: AmpModel::Metal2000,
        usb_gain: 0x7f,
        ..Default::default()
    };
    mustang.set_amplifier(&settings).expect("set amplifier");

    let apply = serialise_apply_command(None).to_vec();
    assert_eq!(
        mustang.transport().written,
        [
            serialise_amp_settings(&settings).to_vec(),
            apply.clone(),
            serialise_amp_settings_usb_gain(&settings).to_vec(),
            apply,
        ]
    );
}

#[test]
fn saving_an_effect_preset() {
    let mut mustang = started();
    let overdrive = EffectSettings {
        slot: 0,
        effect: EffectType::Overdrive,
        knobs: [0x80, 0x40, 0x20, 0x10, 0x08, 0x00],
        post_amp: false,
    };
    let delay = EffectSettings {
        slot: 2,
        effect: EffectType::TapeDelay,
        knobs: [0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
        post_amp: true,
    };
    let effects = [overdrive.clone(), delay];

    mustang.save_effects(2, "Lead", &effects).expect("save effects");

    let written = &mustang.transport().written;
    assert_eq!(written.len(), 4);

    let name = serialise_save_effect_name(2, "Lead", &effects);
    assert_eq!(written[0], name.to_vec());
    assert_eq!(written[0][4], 2);

    let packets = serialise_save_effect_packets(2, &effects);
    assert_eq!(written[1], packets[0].to_vec());
    assert_eq!(written[2], packets[1].to_vec());

    let apply = serialise_apply_command(Some(&overdrive)).to_vec();
    assert_eq!(written[3], apply);
    assert_eq!(written.iter().filter(|p| **p == apply).count(), 1);
}

#[test]
fn invalid_effect_batches() {
    let mut mustang = started();
    let chorus = EffectSettings {
        effect: EffectType::SineChorus,
        ..EffectSettings::empty(1)
    };
    let reverb = EffectSettings {
        effect: EffectType::ArenaReverb,
        ..EffectSettings::empty(3)
    };

    assert!(matches!(
        mustang.save_effects(0, "Nothing", &[]),
        Err(CommandError::InvalidEffectBatch(_))
    ));
    assert!(matches!(
        mustang.save_effects(0, "Too many", &[reverb.clone(), reverb.clone(), reverb.clone()]),
        Err(CommandError::InvalidEffectBatch(_))
    ));
    assert!(matches!(
        mustang.save_effects(0, "Mixed", &[chorus.clone(), reverb]),
        Err(CommandError::InvalidEffectBatch(_))
    ));
    assert!(mustang.transport().written.is_empty());

    mustang.save_effects(0, "Chorus", &[chorus]).expect("save effects");
    assert_eq!(mustang.transport().written[0][3], 0x01);
}

#[test]
fn slots_are_bounded_by_the_directory() {
    let mut mustang = started();

    let error = mustang.load_memory_bank(24).unwrap_err();
    assert!(matches!(error, CommandError::InvalidSlot { slot: 24, max: 24 }));
    assert_eq!(error.code(), -2);
    assert!(matches!(
        mustang.save_on_amp("Nope", 30),
        Err(CommandError::InvalidSlot { .. })
    ));
    assert!(mustang.transport().written.is_empty());
}

#[test]
fn loading_a_bank_ignores_extra_packets() {
    let mut mustang = started();
    let mut replies: Vec<Reply> = preset_window().iter().map(|p| Ok(p.to_vec())).collect();
    replies.push(Ok(named("Trailing").to_vec()));
    replies.push(Ok(named("Trailing").to_vec()));
    replies.push(Ok(Vec::new()));
    queue(&mut mustang, replies);

    let bank = mustang.load_memory_bank(5).expect("load");
    assert_eq!(bank.name, "Current");
    assert_eq!(bank.amp.model, AmpModel::British70s);
    assert_eq!(bank.amp.usb_gain, 0x20);
    assert_eq!(mustang.transport().written, [serialise_load_slot_command(5).to_vec()]);
}

#[test]
fn saving_reloads_the_slot() {
    let mut mustang = started();
    let mut window = preset_window();
    window[0] = named("Saved");
    queue(&mut mustang, vec![ack()]);
    queue(&mut mustang, window.iter().map(|p| Ok(p.to_vec())).collect());

    let bank = mustang.save_on_amp("Saved", 3).expect("save");
    assert_eq!(bank.name, "Saved");
    assert_eq!(
        mustang.transport().written,
        [
            serialise_name(3, "Saved").to_vec(),
            serialise_load_slot_command(3).to_vec(),
        ]
    );
}
