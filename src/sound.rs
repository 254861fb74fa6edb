use anyhow::{anyhow, bail};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::error;

const TONE_HZ: f32 = 440.0;
const AMPLITUDE: f32 = 0.15;

/// A square wave that plays for as long as the tone is switched on.
pub struct Sound {
    stream: cpal::Stream,
    playing: bool,
}

impl Sound {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();

        let stream = match sample_format {
            cpal::SampleFormat::I8 => build::<i8>(&device, &config)?,
            cpal::SampleFormat::I16 => build::<i16>(&device, &config)?,
            cpal::SampleFormat::I32 => build::<i32>(&device, &config)?,
            cpal::SampleFormat::I64 => build::<i64>(&device, &config)?,
            cpal::SampleFormat::U8 => build::<u8>(&device, &config)?,
            cpal::SampleFormat::U16 => build::<u16>(&device, &config)?,
            cpal::SampleFormat::U32 => build::<u32>(&device, &config)?,
            cpal::SampleFormat::U64 => build::<u64>(&device, &config)?,
            cpal::SampleFormat::F32 => build::<f32>(&device, &config)?,
            cpal::SampleFormat::F64 => build::<f64>(&device, &config)?,
            sample_format => bail!("unsupported sample format '{sample_format}'"),
        };
        stream.pause()?;

        Ok(Self {
            stream,
            playing: false,
        })
    }

    pub fn set_tone(&mut self, on: bool) -> anyhow::Result<()> {
        if on == self.playing {
            return Ok(());
        }
        if on {
            self.stream.play()?;
        } else {
            self.stream.pause()?;
        }
        self.playing = on;
        Ok(())
    }
}

fn build<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let period = sample_rate / TONE_HZ;

    // flips sign every half period
    let mut sample_clock = 0f32;
    let mut next_value = move || {
        sample_clock = (sample_clock + 1.0) % period;
        if sample_clock < period / 2.0 {
            AMPLITUDE
        } else {
            -AMPLITUDE
        }
    };

    let err_fn = |err| error!("an error occurred on stream: {}", err);

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            write_data(data, channels, &mut next_value)
        },
        err_fn,
        None,
    )
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
