use mustang_types::{EffectCategory, EffectSettings};

use crate::cli::EffectBank;

impl EffectBank {
    fn categories(&self) -> &'static [EffectCategory] {
        match self {
            EffectBank::Modulation => &[EffectCategory::Modulation],
            EffectBank::Delay => &[EffectCategory::Delay],
            EffectBank::Reverb => &[EffectCategory::Reverb],
            EffectBank::DelayReverb => &[EffectCategory::Delay, EffectCategory::Reverb],
        }
    }
}

/// Picks the effects making up an effect preset from a full set, delay ahead of reverb. Returns
/// the first requested category the set has no effect for.
pub fn effect_batch(
    effects: &[EffectSettings],
    bank: EffectBank,
) -> Result<Vec<EffectSettings>, EffectCategory> {
    bank.categories()
        .iter()
        .map(|category| {
            effects
                .iter()
                .find(|effect| effect.category() == Some(*category))
                .cloned()
                .ok_or(*category)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mustang_types::EffectType;
    use mustang_usb::error::{CommandError, ConnectError};
    use mustang_usb::{AmpTransport, Mustang, SessionConfig};

    // Acknowledges everything with a zero-length read, which the session reads as an empty amp.
    #[derive(Default)]
    struct SilentAmp {
        open: bool,
        written: Vec<Vec<u8>>,
    }

    impl AmpTransport for SilentAmp {
        fn open(&mut self, _vendor_id: u16, _product_ids: &[u16]) -> Result<(), ConnectError> {
            self.open = true;
            Ok(())
        }

        fn close(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn interrupt_write(&mut self, _endpoint: u8, data: &[u8]) -> Result<usize, CommandError> {
            self.written.push(data.to_vec());
            Ok(data.len())
        }

        fn interrupt_read(
            &mut self,
            _endpoint: u8,
            _length: usize,
        ) -> Result<Vec<u8>, CommandError> {
            Ok(Vec::new())
        }
    }

    fn effect(slot: u8, effect: EffectType, post_amp: bool) -> EffectSettings {
        EffectSettings {
            slot,
            effect,
            knobs: [0x40; 6],
            post_amp,
        }
    }

    fn full_set() -> [EffectSettings; 4] {
        [
            effect(0, EffectType::Overdrive, false),
            effect(1, EffectType::SineChorus, false),
            effect(2, EffectType::MonoDelay, true),
            effect(3, EffectType::SmallHallReverb, true),
        ]
    }

    fn saved_packets(batch: &[EffectSettings]) -> Result<usize, CommandError> {
        let mut mustang = Mustang::with_transport(SilentAmp::default(), SessionConfig::default());
        mustang.start().expect("start");

        let before = mustang.transport().written.len();
        mustang.save_effects(2, "Lead", batch)?;
        Ok(mustang.transport().written.len() - before)
    }

    #[test]
    fn every_bank_is_accepted_by_the_amplifier() {
        let effects = full_set();

        for (bank, expected) in [
            (EffectBank::Modulation, vec![EffectType::SineChorus]),
            (EffectBank::Delay, vec![EffectType::MonoDelay]),
            (EffectBank::Reverb, vec![EffectType::SmallHallReverb]),
            (
                EffectBank::DelayReverb,
                vec![EffectType::MonoDelay, EffectType::SmallHallReverb],
            ),
        ] {
            let batch = effect_batch(&effects, bank).expect("batch");
            let types: Vec<EffectType> = batch.iter().map(|effect| effect.effect).collect();
            assert_eq!(types, expected, "{:?}", bank);

            // Name packet, one per effect, then the apply.
            let sent = saved_packets(&batch).expect("save");
            assert_eq!(sent, batch.len() + 2, "{:?}", bank);
        }
    }

    #[test]
    fn delay_comes_before_reverb() {
        let mut effects = full_set();
        effects.swap(2, 3);

        let batch = effect_batch(&effects, EffectBank::DelayReverb).expect("batch");
        assert_eq!(batch[0].effect, EffectType::MonoDelay);
        assert_eq!(batch[1].effect, EffectType::SmallHallReverb);
    }

    #[test]
    fn missing_effect_is_reported() {
        let mut effects = full_set();
        effects[3] = EffectSettings::empty(3);

        assert_eq!(
            effect_batch(&effects, EffectBank::DelayReverb),
            Err(EffectCategory::Reverb)
        );
        assert_eq!(
            effect_batch(&effects, EffectBank::Reverb),
            Err(EffectCategory::Reverb)
        );
        assert!(effect_batch(&effects, EffectBank::Delay).is_ok());
    }
}
