use super::*;
use crate::environment::EnvironmentWatcher;
use obs_backends::environment::fake::FakeEnvironmentSource;
use obs_backends::StaticActionRegistry;
use obs_core::test_support::fresh_sensor;
use obs_core::FakeClock;
use obs_wire::{CommandStatus, Request};
use chrono::{TimeZone, Utc};
use std::net::TcpStream;
use std::time::Duration;

fn daemon(control_machines: Vec<std::net::IpAddr>) -> OperationsDaemon<FakeClock> {
    let clock = FakeClock::new(Utc.with_ymd_and_hms(2024, 3, 14, 22, 0, 0).unwrap());
    let source = Arc::new(FakeEnvironmentSource::new());
    source.set_reading(fresh_sensor("rain", 0.0, clock.utc_now()));
    let environment = EnvironmentWatcher::new(vec![], source, 2, clock.clone());
    let config = obs_config::Config {
        daemon: "opsd".into(),
        log_name: "opsd".into(),
        control_machines,
        pipeline_machines: vec![],
        actions_module: "fake".into(),
        scripts_module: String::new(),
        loop_delay: Duration::from_secs(10),
        site: obs_config::SiteConfig { latitude_deg: 0.0, longitude_deg: 0.0, elevation_m: 0.0, sun_altitude_limit_deg: -12.0 },
        dome: None,
        environment_daemon: "envd".into(),
        environment_conditions: vec![],
        environment_poll_grace_ticks: 2,
    };
    OperationsDaemon::new(config, environment, None, Arc::new(StaticActionRegistry::new()), clock)
}

#[test]
fn status_request_round_trips_over_tcp() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind failed");
    let addr = listener.local_addr().expect("local_addr failed");
    let daemon = Arc::new(daemon(vec!["127.0.0.1".parse().unwrap()]));

    std::thread::spawn(move || serve(listener, daemon));

    let mut stream = TcpStream::connect(addr).expect("connect failed");
    write_response_free_request(&mut stream, &Request::Status);
    let response: obs_wire::Response = read_response(&mut stream);
    assert!(matches!(response, obs_wire::Response::Status(_)));
}

#[test]
fn control_command_from_an_unlisted_caller_is_rejected_over_tcp() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind failed");
    let addr = listener.local_addr().expect("local_addr failed");
    // No control machines configured, so even loopback is unauthorized.
    let daemon = Arc::new(daemon(vec![]));

    std::thread::spawn(move || serve(listener, daemon));

    let mut stream = TcpStream::connect(addr).expect("connect failed");
    write_response_free_request(&mut stream, &Request::TelControl { auto: true });
    let response: obs_wire::Response = read_response(&mut stream);
    assert_eq!(response, obs_wire::Response::Command(CommandStatus::InvalidControlIp));
}

fn write_response_free_request(stream: &mut TcpStream, request: &Request) {
    obs_wire::write_message(stream, &obs_wire::encode(request).expect("encode failed")).expect("write failed");
}

fn read_response(stream: &mut TcpStream) -> obs_wire::Response {
    let bytes = obs_wire::read_message(stream).expect("read failed");
    obs_wire::decode(&bytes).expect("decode failed")
}
