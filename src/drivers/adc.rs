// TempWatch - Temperature Sensor ADC
//
// One-shot ADC1 reads through the raw ESP-IDF API (12-bit, 11 dB attenuation
// for the full 0-3.3 V range).

use anyhow::Context;
use esp_idf_sys::{self as sys, esp};

use crate::config::*;
use crate::drivers::SensorSource;

pub struct AdcSensor {
    handle: sys::adc_oneshot_unit_handle_t,
    channel: sys::adc_channel_t,
}

// SAFETY: the oneshot handle is only ever used from the sampling task that
// owns this driver; the ADC driver itself serialises access to the unit.
unsafe impl Send for AdcSensor {}

impl AdcSensor {
    /// ADC1 on the channel wired to [`PIN_SENSOR_ADC`] (GPIO2 = ADC1_CHANNEL_2).
    pub fn new() -> anyhow::Result<Self> {
        let channel = PIN_SENSOR_ADC as sys::adc_channel_t;
        let mut handle: sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();

        unsafe {
            let unit_cfg = sys::adc_oneshot_unit_init_cfg_t {
                unit_id: sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(sys::adc_oneshot_new_unit(&unit_cfg, &mut handle)).context("ADC unit init")?;

            let chan_cfg = sys::adc_oneshot_chan_cfg_t {
                atten: sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            esp!(sys::adc_oneshot_config_channel(handle, channel, &chan_cfg))
                .context("ADC channel config")?;
        }

        log::info!("ADC1 channel {} ready (12-bit, 11 dB)", channel);
        Ok(Self { handle, channel })
    }
}

impl SensorSource for AdcSensor {
    fn read_raw(&mut self) -> anyhow::Result<u16> {
        let mut raw: i32 = 0;
        esp!(unsafe { sys::adc_oneshot_read(self.handle, self.channel, &mut raw) })?;
        u16::try_from(raw).context("negative ADC reading")
    }
}
