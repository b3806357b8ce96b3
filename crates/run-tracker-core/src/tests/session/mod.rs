mod controller;
mod gps_monitor;
