// Both spot and contract prices are quoted per megawatt-hour.
quantity!(YuanPerMegawattHour, "¥/MWh");
