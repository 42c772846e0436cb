//! Controller setting command handlers.

use anyhow::Context;
use blusb_keyboard::{Debounce, Pwm};

use super::{with_keyboard, CommandResult, DeviceOptions};

pub fn read_pwm(opts: &DeviceOptions) -> CommandResult {
    with_keyboard(opts, |kb| {
        let pwm = kb.read_pwm().context("Reading PWM")?;
        println!("PWM {pwm}");
        Ok(())
    })
}

pub fn write_pwm(opts: &DeviceOptions, usb: u8, bluetooth: u8) -> CommandResult {
    let pwm = Pwm::new(usb, bluetooth);
    with_keyboard(opts, |kb| {
        kb.write_pwm(pwm).context("Writing PWM")?;
        println!("PWM set to {pwm}");
        Ok(())
    })
}

pub fn read_debounce(opts: &DeviceOptions) -> CommandResult {
    with_keyboard(opts, |kb| {
        let debounce = kb.read_debounce().context("Reading debounce")?;
        println!("Debounce: {debounce}");
        Ok(())
    })
}

pub fn write_debounce(opts: &DeviceOptions, ms: u8) -> CommandResult {
    let debounce = Debounce::new(ms)?;
    with_keyboard(opts, |kb| {
        kb.write_debounce(debounce).context("Writing debounce")?;
        println!("Debounce set to {debounce}");
        Ok(())
    })
}
