use ndarray::{Array2, ArrayView1};
use crate::ecg::EcgError;
/// First waveform record of a dataset, exactly as the reader supplied it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawWaveformRecord {
    pub channel_count: u16,
    pub sample_count: u64,
    pub interleaved_samples: Vec<u16>, // sample-major: s0c0, s0c1, ..., s1c0, ...
}
impl RawWaveformRecord {
    pub fn decode(&self) -> Result<WaveformMatrix, EcgError> {
        decode(self.channel_count, self.sample_count, &self.interleaved_samples)
    }
}
/// Signed amplitudes in raw sensor units, indexed `[channel][sample]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveformMatrix {
    samples: Array2<i16>, // channels x samples
}
impl WaveformMatrix {
    pub fn empty() -> Self {
        Self {
            samples: Array2::zeros((0, 0)),
        }
    }
    pub fn channel_count(&self) -> usize {
        self.samples.nrows()
    }
    pub fn sample_count(&self) -> usize {
        self.samples.ncols()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn channel(&self, index: usize) -> ArrayView1<'_, i16> {
        self.samples.row(index)
    }
    #[cfg(test)]
    pub fn get(&self, channel: usize, sample: usize) -> Option<i16> {
        self.samples.get((channel, sample)).copied()
    }
}
/// Reinterprets the bit pattern of a raw value as two's-complement, without numeric conversion.
pub fn reinterpret_signed(raw: u16) -> i16 {
    i16::from_ne_bytes(raw.to_ne_bytes())
}
/// De-interleave a multiplexed buffer into a channel-major matrix.
///
/// The buffer must hold exactly `channel_count * sample_count` values; anything else is a
/// malformed record and is rejected before any element is read. A record with no channels
/// or no samples decodes to an empty matrix.
pub fn decode(
    channel_count: u16,
    sample_count: u64,
    interleaved: &[u16],
) -> Result<WaveformMatrix, EcgError> {
    let malformed = || EcgError::Decode {
        channels: channel_count,
        samples: sample_count,
        actual: interleaved.len(),
    };
    let channels = usize::from(channel_count);
    let samples = usize::try_from(sample_count).map_err(|_| malformed())?;
    let expected = channels.checked_mul(samples).ok_or_else(malformed)?;
    if interleaved.len() != expected {
        return Err(malformed());
    }
    if expected == 0 {
        return Ok(WaveformMatrix::empty());
    }
    let samples = Array2::from_shape_fn((channels, samples), |(channel, sample)| {
        reinterpret_signed(interleaved[sample * channels + channel])
    });
    Ok(WaveformMatrix { samples })
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    #[test]
    fn reinterpretation_keeps_bit_pattern() {
        assert_eq!(reinterpret_signed(0x0000), 0);
        assert_eq!(reinterpret_signed(0x7FFF), i16::MAX);
        assert_eq!(reinterpret_signed(0x8000), i16::MIN);
        assert_eq!(reinterpret_signed(0xFFFF), -1);
        assert_eq!(reinterpret_signed(0xFE0C), -500);
    }
    #[test]
    fn deinterleaves_sample_major_buffer() {
        // 3 channels, 2 samples
        let raw = [1, 2, 3, 4, 5, 0xFFFF];
        let matrix = decode(3, 2, &raw).unwrap();
        assert_eq!(matrix.channel_count(), 3);
        assert_eq!(matrix.sample_count(), 2);
        assert_eq!(matrix.channel(0).to_vec(), vec![1, 4]);
        assert_eq!(matrix.channel(1).to_vec(), vec![2, 5]);
        assert_eq!(matrix.channel(2).to_vec(), vec![3, -1]);
    }
    #[test]
    fn random_buffers_map_every_cell() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let channels: u16 = rng.gen_range(1..=16);
            let samples: u64 = rng.gen_range(1..=64);
            let raw: Vec<u16> = (0..usize::from(channels) * samples as usize)
                .map(|_| rng.gen())
                .collect();
            let matrix = decode(channels, samples, &raw).unwrap();
            for c in 0..usize::from(channels) {
                for s in 0..samples as usize {
                    assert_eq!(
                        matrix.get(c, s),
                        Some(reinterpret_signed(raw[s * usize::from(channels) + c]))
                    );
                }
            }
        }
    }
    #[test]
    fn length_mismatch_is_rejected() {
        let short = decode(12, 500, &[0; 5999]).unwrap_err();
        assert!(matches!(
            short,
            EcgError::Decode {
                channels: 12,
                samples: 500,
                actual: 5999
            }
        ));
        assert!(matches!(decode(2, 2, &[0; 5]), Err(EcgError::Decode { .. })));
        assert!(matches!(decode(0, 10, &[1]), Err(EcgError::Decode { .. })));
    }
    #[test]
    fn oversized_shape_does_not_overflow() {
        let err = decode(u16::MAX, u64::MAX, &[0; 4]).unwrap_err();
        assert!(matches!(err, EcgError::Decode { .. }));
    }
    #[test]
    fn zero_dimensions_decode_to_empty() {
        assert!(decode(0, 0, &[]).unwrap().is_empty());
        let no_samples = decode(12, 0, &[]).unwrap();
        assert_eq!(no_samples, WaveformMatrix::empty());
        assert_eq!(no_samples.channel_count(), 0);
    }
    #[test]
    fn record_decodes_through_helper() {
        let record = RawWaveformRecord {
            channel_count: 1,
            sample_count: 3,
            interleaved_samples: vec![10, 20, 0x8000],
        };
        assert_eq!(record.decode().unwrap().channel(0).to_vec(), vec![10, 20, i16::MIN]);
    }
}
