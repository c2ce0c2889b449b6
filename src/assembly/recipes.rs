//! The mechanical parts of the linear actuator and gear train, as recipes.
//!
//! All lengths are in meters. Cylinder phases and the odd sub-millimeter
//! offsets keep rim vertices and tooth corners off each other's faces; exact
//! contact is rejected by the boolean engine.

use std::f64::consts::PI;

use crate::host::Primitive;
use crate::math::Vector3;
use crate::operations::boolean::BooleanOp;
use crate::operations::profile::ThreadShape;

use super::part::Recipe;
use super::step::{Contact, Placement, Step, ThreadSpec, ToolSpec};

const PISTON_LENGTH: f64 = 0.03;
const PISTON_RADIUS: f64 = 0.005;
const PISTON_RIB_OFFSET: f64 = 0.0048;
const THREAD_PITCH: f64 = 0.0005;

const HOUSING_LENGTH: f64 = 0.05;
const HOUSING_RADIUS: f64 = 0.01;

const RACK_LENGTH: f64 = 0.07;
const RACK_WIDTH: f64 = 0.006;

const GEAR_MODULUS: f64 = 0.001;
const GEAR_THICKNESS: f64 = 0.006;

fn cuboid(x: f64, y: f64, z: f64) -> ToolSpec {
    ToolSpec::Primitive(Primitive::cuboid(x, y, z))
}

fn cylinder(radius: f64, depth: f64, segments: usize) -> ToolSpec {
    ToolSpec::Primitive(Primitive::cylinder(radius, depth, segments))
}

fn cylinder_at_phase(radius: f64, depth: f64, segments: usize, phase: f64) -> ToolSpec {
    ToolSpec::Primitive(Primitive::cylinder(radius, depth, segments).with_phase(phase))
}

fn down() -> Contact {
    Contact::Shift(-Vector3::z())
}

/// Three guide ribs around a round body, one on `+Y` and one on each side
/// of `X`, leaving `-Y` free for the flat.
fn guide_ribs(prefix: &str, offset: f64, rib: &ToolSpec, z: f64) -> Vec<Step> {
    [(0.0, offset), (offset, 0.0), (-offset, 0.0)]
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| {
            Step::new(format!("{prefix}_{i}"), BooleanOp::Union, rib.clone())
                .at(Placement::at(x, y, z))
                .contact(Contact::AxialEnds)
        })
        .collect()
}

/// Threaded piston with three guide ribs, an anti-rotation flat and a
/// threaded bore for the lead screw.
#[must_use]
pub fn piston() -> Recipe {
    let mid = PISTON_LENGTH / 2.0;
    let rib = cylinder(0.001, PISTON_LENGTH, 32);

    let mut steps = guide_ribs("guide_rib", PISTON_RIB_OFFSET, &rib, mid);
    steps.push(
        Step::new(
            "anti_rotation_flat",
            BooleanOp::Difference,
            cuboid(0.02, 0.01, 0.04),
        )
        .at(Placement::at(0.0, -0.008, mid)),
    );
    steps.push(
        Step::new(
            "screw_bore",
            BooleanOp::Difference,
            cylinder(0.00125, PISTON_LENGTH + 0.004, 64),
        )
        .at(Placement::at(0.0, 0.0, mid)),
    );
    steps.push(Step::new(
        "internal_thread",
        BooleanOp::Difference,
        ToolSpec::Thread(ThreadSpec {
            minor_radius: 0.00105,
            major_radius: 0.0015,
            pitch: THREAD_PITCH,
            shape: ThreadShape::Triangle,
            turns: 72.0,
            steps_per_turn: 32,
            phase: PI / 256.0,
            start: -0.002 - THREAD_PITCH / 64.0,
        }),
    ));

    Recipe {
        name: "Linear_Actuator_Piston".into(),
        base: cylinder(PISTON_RADIUS, PISTON_LENGTH, 128),
        at: Placement::at(0.0, 0.0, mid),
        steps,
        file_name: "Linear_Actuator_Piston.stl".into(),
        scale: 1.0,
    }
}

/// The piston grown by a sliding clearance, used to hollow out the housing.
fn swollen_piston() -> ToolSpec {
    let length = HOUSING_LENGTH + 0.002;
    let rib = cylinder(0.00124, length, 32);
    let mut steps = guide_ribs("dummy_rib", 0.0051, &rib, 0.0);
    steps.push(
        Step::new("dummy_flat", BooleanOp::Difference, cuboid(0.025, 0.01, 0.06))
            .at(Placement::at(0.0, -0.0083, 0.0)),
    );
    ToolSpec::Compound {
        base: Box::new(cylinder_at_phase(0.0053, length, 128, 0.0)),
        steps,
    }
}

/// Cylindrical sleeve the piston slides in, with a mounting block, a motor
/// cavity and a shaft passage.
#[must_use]
pub fn housing() -> Recipe {
    let mid = HOUSING_LENGTH / 2.0;
    let steps = vec![
        Step::new("mount_block", BooleanOp::Union, cuboid(0.038, 0.022, 0.022))
            .at(Placement::at(0.0, 0.0, -0.011))
            .contact(Contact::Shift(Vector3::z())),
        Step::new("piston_channel", BooleanOp::Difference, swollen_piston())
            .at(Placement::at(0.0, 0.0, mid)),
        Step::new("motor_cavity", BooleanOp::Difference, cuboid(0.03, 0.04, 0.04))
            .at(Placement::at(0.0, 0.013, -0.023)),
        Step::new(
            "shaft_passage",
            BooleanOp::Difference,
            cylinder_at_phase(0.004, 0.015, 64, PI / 128.0),
        ),
    ];

    Recipe {
        name: "Linear_Actuator_Housing".into(),
        base: cylinder(HOUSING_RADIUS, HOUSING_LENGTH, 128),
        at: Placement::at(0.0, 0.0, mid),
        steps,
        file_name: "Linear_Actuator_Housing.stl".into(),
        scale: 1.0,
    }
}

/// Square rack with one tooth gap per circular pitch and a round pad on top.
#[must_use]
pub fn pump_rack() -> Recipe {
    let pitch = PI * GEAR_MODULUS;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let gaps = (RACK_LENGTH / pitch) as usize - 2;

    let mut steps: Vec<Step> = (0..gaps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let z = i as f64 * pitch + 0.005;
            Step::new(
                format!("tooth_gap_{i}"),
                BooleanOp::Difference,
                cuboid(0.008, pitch * 0.5, 0.00225),
            )
            .at(Placement::at(0.0, RACK_WIDTH / 2.0, z))
        })
        .collect();
    steps.push(
        Step::new("top_pad", BooleanOp::Union, cylinder(0.00475, 0.002, 64))
            .at(Placement::at(0.0, 0.0, RACK_LENGTH + 0.001))
            .contact(down()),
    );

    Recipe {
        name: "1_Pump_Rack".into(),
        base: cuboid(RACK_WIDTH, RACK_WIDTH, RACK_LENGTH),
        at: Placement::at(0.0, 0.0, RACK_LENGTH / 2.0),
        steps,
        file_name: "1_Pump_Rack.stl".into(),
        scale: 1.0,
    }
}

/// A 15-tooth pinion stacked under a 40-tooth worm wheel, bored for a shaft.
#[must_use]
pub fn pinion_wheel() -> Recipe {
    let gear = |teeth| ToolSpec::Gear {
        teeth,
        modulus: GEAR_MODULUS,
        thickness: GEAR_THICKNESS,
    };
    let steps = vec![
        Step::new("worm_wheel", BooleanOp::Union, gear(40))
            .at(Placement::at(0.0, 0.0, GEAR_THICKNESS))
            .contact(down()),
        Step::new("shaft_hole", BooleanOp::Difference, cylinder(0.0015, 0.02, 32))
            .at(Placement::at(0.0, 0.0, GEAR_THICKNESS)),
    ];

    Recipe {
        name: "2_Pinion_Wheel_Assembly".into(),
        base: gear(15),
        at: Placement::default(),
        steps,
        file_name: "2_Pinion_Wheel_Assembly.stl".into(),
        scale: 1.0,
    }
}

/// The spline cross of an SG90 servo horn, centered at the origin.
fn servo_cross() -> ToolSpec {
    ToolSpec::Compound {
        base: Box::new(cuboid(0.005, 0.0012, 0.008)),
        steps: vec![
            Step::new("cross_bar", BooleanOp::Union, cuboid(0.0012, 0.005, 0.008))
                .contact(Contact::AxialEnds),
        ],
    }
}

/// Single-start worm with a servo spline socket in its lower end.
#[must_use]
pub fn worm_drive() -> Recipe {
    let pitch = PI * GEAR_MODULUS;
    let steps = vec![
        Step::new(
            "worm_thread",
            BooleanOp::Difference,
            ToolSpec::Thread(ThreadSpec {
                minor_radius: 0.00375,
                major_radius: 0.007,
                pitch,
                shape: ThreadShape::Trapezoid,
                turns: 8.0,
                steps_per_turn: 32,
                phase: 0.0,
                start: -pitch - pitch / 64.0,
            }),
        ),
        Step::new("servo_socket", BooleanOp::Difference, servo_cross()),
    ];

    Recipe {
        name: "3_Worm_Drive".into(),
        base: cylinder(0.006, 0.02, 64),
        at: Placement::at(0.0, 0.0, 0.01),
        steps,
        file_name: "3_Worm_Drive.stl".into(),
        scale: 1.0,
    }
}

/// Plate that carries the rack guide, the servo block and the wheel axle.
///
/// The axle goes in last: it stands inside the wheel clearance, which would
/// otherwise cut it away again.
#[must_use]
pub fn base_plate() -> Recipe {
    let steps = vec![
        Step::new("rear_wall", BooleanOp::Union, cuboid(0.075, 0.0073, 0.008))
            .at(Placement::at(0.0, -0.01635, 0.004))
            .contact(down()),
        Step::new("rack_clip_left", BooleanOp::Union, cuboid(0.02, 0.0063, 0.008))
            .at(Placement::at(-0.025, -0.00315, 0.004))
            .contact(down()),
        Step::new("rack_clip_right", BooleanOp::Union, cuboid(0.02, 0.0063, 0.008))
            .at(Placement::at(0.025, -0.00315, 0.004))
            .contact(down()),
        Step::new("motor_block", BooleanOp::Union, cuboid(0.034, 0.03, 0.016))
            .at(Placement::at(0.025, 0.025, 0.008))
            .contact(down()),
        Step::new("servo_cavity", BooleanOp::Difference, cuboid(0.0265, 0.03, 0.03))
            .at(Placement::at(0.025, 0.026, 0.01675)),
        Step::new(
            "worm_pass_through",
            BooleanOp::Difference,
            cylinder(0.0065, 0.02, 64),
        )
        .at(Placement::at(0.025, 0.005, 0.009).rotated(Vector3::x(), PI / 2.0)),
        Step::new("bearing_recess", BooleanOp::Difference, cylinder(0.01, 0.004, 64)),
        Step::new(
            "wheel_clearance",
            BooleanOp::Difference,
            cylinder(0.0225, 0.02, 64),
        )
        .at(Placement::at(0.0, 0.0, 0.015)),
        Step::new(
            "wheel_axle",
            BooleanOp::Union,
            cylinder_at_phase(0.00135, 0.014, 64, PI / 128.0),
        )
        .at(Placement::at(0.0, 0.0, 0.005))
        .contact(down()),
    ];

    Recipe {
        name: "4_Prototyping_Base".into(),
        base: cuboid(0.085, 0.07, 0.004),
        at: Placement::at(0.0025, 0.01, -0.002),
        steps,
        file_name: "4_Prototyping_Base.stl".into(),
        scale: 1.0,
    }
}

/// Every part of the mechanism, in build order.
#[must_use]
pub fn catalog() -> Vec<Recipe> {
    vec![
        piston(),
        housing(),
        pump_rack(),
        pinion_wheel(),
        worm_drive(),
        base_plate(),
    ]
}
