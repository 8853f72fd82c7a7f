use anyhow::Result;
use mustang_types::MemoryBank;
use mustang_usb::{AmpState, MustangDevice};
use serde::Serialize;

#[derive(Serialize)]
struct Device {
    bus_number: u8,
    address: u8,
    variant: String,
}

#[derive(Serialize)]
struct Status<'a> {
    current: &'a MemoryBank,
    presets: &'a [String],
}

pub fn print_devices(devices: &[MustangDevice], json: bool) -> Result<()> {
    if json {
        let devices: Vec<Device> = devices
            .iter()
            .map(|device| Device {
                bus_number: device.bus_number(),
                address: device.address(),
                variant: device.variant().to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No amplifiers found");
    }
    for device in devices {
        println!(
            "{} (bus {:03}, address {:03})",
            device.variant(),
            device.bus_number(),
            device.address()
        );
    }
    Ok(())
}

pub fn print_state(state: &AmpState, json: bool) -> Result<()> {
    if json {
        let status = Status {
            current: &state.current,
            presets: &state.presets,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    print_bank(&state.current, false)?;

    println!();
    println!("Presets:");
    for (slot, name) in state.presets.iter().enumerate() {
        if !name.is_empty() {
            println!("  {:02}: {}", slot, name);
        }
    }
    Ok(())
}

pub fn print_bank(bank: &MemoryBank, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(bank)?);
        return Ok(());
    }

    let amp = &bank.amp;
    println!("Name: {}", bank.name);
    println!("Amplifier: {} ({})", amp.model, amp.cabinet);
    println!(
        "  Volume {} Gain {} Gain2 {} Master {}",
        amp.volume, amp.gain, amp.gain2, amp.master_volume
    );
    println!(
        "  Treble {} Middle {} Bass {} Presence {}",
        amp.treble, amp.middle, amp.bass, amp.presence
    );
    println!(
        "  Gate {} Threshold {} Depth {} Bias {} Sag {} Bright {} USB Gain {}",
        amp.noise_gate, amp.threshold, amp.depth, amp.bias, amp.sag, amp.bright, amp.usb_gain
    );

    println!("Effects:");
    for effect in bank.active_effects() {
        let knobs: Vec<String> = effect
            .knobs
            .iter()
            .map(|knob| knob.to_string())
            .collect();
        println!(
            "  [{}] {} {}",
            effect.physical_slot(),
            effect.effect,
            knobs.join(" ")
        );
    }
    Ok(())
}
