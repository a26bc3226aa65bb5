quantity!(Volts, "V");
