//! Header layouts of the BC6H modes.
//!
//! Each mode stores its endpoints and partition id as a run of bit segments
//! directly after the mode prefix. A segment moves `len` bits of one field,
//! starting at bit `shift` of that field. Reversed fields (modes 11 and 15)
//! are spelled out as single bit segments in stream order.

/// Destination of a run of header bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Field {
    /// Channel `channel` of endpoint `endpoint` (w, x, y, z = 0, 1, 2, 3).
    Endpoint { endpoint: u8, channel: u8 },
    Partition,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    pub(crate) field: Field,
    pub(crate) shift: u8,
    pub(crate) len: u8,
}

const RW: Field = Field::Endpoint { endpoint: 0, channel: 0 };
const GW: Field = Field::Endpoint { endpoint: 0, channel: 1 };
const BW: Field = Field::Endpoint { endpoint: 0, channel: 2 };
const RX: Field = Field::Endpoint { endpoint: 1, channel: 0 };
const GX: Field = Field::Endpoint { endpoint: 1, channel: 1 };
const BX: Field = Field::Endpoint { endpoint: 1, channel: 2 };
const RY: Field = Field::Endpoint { endpoint: 2, channel: 0 };
const GY: Field = Field::Endpoint { endpoint: 2, channel: 1 };
const BY: Field = Field::Endpoint { endpoint: 2, channel: 2 };
const RZ: Field = Field::Endpoint { endpoint: 3, channel: 0 };
const GZ: Field = Field::Endpoint { endpoint: 3, channel: 1 };
const BZ: Field = Field::Endpoint { endpoint: 3, channel: 2 };
const D: Field = Field::Partition;

const fn s(field: Field, shift: u8, len: u8) -> Segment {
    Segment { field, shift, len }
}

/// 10.555, 10.555, 10.555
#[rustfmt::skip]
pub(crate) static MODE_0: &[Segment] = &[
    s(GY, 4, 1), s(BY, 4, 1), s(BZ, 4, 1), s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10),
    s(RX, 0, 5), s(GZ, 4, 1), s(GY, 0, 4), s(GX, 0, 5), s(BZ, 0, 1), s(GZ, 0, 4),
    s(BX, 0, 5), s(BZ, 1, 1), s(BY, 0, 4), s(RY, 0, 5), s(BZ, 2, 1), s(RZ, 0, 5),
    s(BZ, 3, 1), s(D, 0, 5),
];

/// 7666, 7666, 7666
#[rustfmt::skip]
pub(crate) static MODE_1: &[Segment] = &[
    s(GY, 5, 1), s(GZ, 4, 1), s(GZ, 5, 1), s(RW, 0, 7), s(BZ, 0, 1), s(BZ, 1, 1),
    s(BY, 4, 1), s(GW, 0, 7), s(BY, 5, 1), s(BZ, 2, 1), s(GY, 4, 1), s(BW, 0, 7),
    s(BZ, 3, 1), s(BZ, 5, 1), s(BZ, 4, 1), s(RX, 0, 6), s(GY, 0, 4), s(GX, 0, 6),
    s(GZ, 0, 4), s(BX, 0, 6), s(BY, 0, 4), s(RY, 0, 6), s(RZ, 0, 6), s(D, 0, 5),
];

/// 11.555, 11.444, 11.444
#[rustfmt::skip]
pub(crate) static MODE_2: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10), s(RX, 0, 5), s(RW, 10, 1), s(GY, 0, 4),
    s(GX, 0, 4), s(GW, 10, 1), s(BZ, 0, 1), s(GZ, 0, 4), s(BX, 0, 4), s(BW, 10, 1),
    s(BZ, 1, 1), s(BY, 0, 4), s(RY, 0, 5), s(BZ, 2, 1), s(RZ, 0, 5), s(BZ, 3, 1),
    s(D, 0, 5),
];

/// 11.444, 11.555, 11.444
#[rustfmt::skip]
pub(crate) static MODE_6: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10), s(RX, 0, 4), s(RW, 10, 1), s(GZ, 4, 1),
    s(GY, 0, 4), s(GX, 0, 5), s(GW, 10, 1), s(GZ, 0, 4), s(BX, 0, 4), s(BW, 10, 1),
    s(BZ, 1, 1), s(BY, 0, 4), s(RY, 0, 4), s(BZ, 0, 1), s(BZ, 2, 1), s(RZ, 0, 4),
    s(GY, 4, 1), s(BZ, 3, 1), s(D, 0, 5),
];

/// 11.444, 11.444, 11.555
#[rustfmt::skip]
pub(crate) static MODE_10: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10), s(RX, 0, 4), s(RW, 10, 1), s(BY, 4, 1),
    s(GY, 0, 4), s(GX, 0, 4), s(GW, 10, 1), s(BZ, 0, 1), s(GZ, 0, 4), s(BX, 0, 5),
    s(BW, 10, 1), s(BY, 0, 4), s(RY, 0, 4), s(BZ, 1, 1), s(BZ, 2, 1), s(RZ, 0, 4),
    s(BZ, 4, 1), s(BZ, 3, 1), s(D, 0, 5),
];

/// 9555, 9555, 9555
#[rustfmt::skip]
pub(crate) static MODE_14: &[Segment] = &[
    s(RW, 0, 9), s(BY, 4, 1), s(GW, 0, 9), s(GY, 4, 1), s(BW, 0, 9), s(BZ, 4, 1),
    s(RX, 0, 5), s(GZ, 4, 1), s(GY, 0, 4), s(GX, 0, 5), s(BZ, 0, 1), s(GZ, 0, 4),
    s(BX, 0, 5), s(BZ, 1, 1), s(BY, 0, 4), s(RY, 0, 5), s(BZ, 2, 1), s(RZ, 0, 5),
    s(BZ, 3, 1), s(D, 0, 5),
];

/// 8666, 8555, 8555
#[rustfmt::skip]
pub(crate) static MODE_18: &[Segment] = &[
    s(RW, 0, 8), s(GZ, 4, 1), s(BY, 4, 1), s(GW, 0, 8), s(BZ, 2, 1), s(GY, 4, 1),
    s(BW, 0, 8), s(BZ, 3, 1), s(BZ, 4, 1), s(RX, 0, 6), s(GY, 0, 4), s(GX, 0, 5),
    s(BZ, 0, 1), s(GZ, 0, 4), s(BX, 0, 5), s(BZ, 1, 1), s(BY, 0, 4), s(RY, 0, 6),
    s(RZ, 0, 6), s(D, 0, 5),
];

/// 8555, 8666, 8555
#[rustfmt::skip]
pub(crate) static MODE_22: &[Segment] = &[
    s(RW, 0, 8), s(BZ, 0, 1), s(BY, 4, 1), s(GW, 0, 8), s(GY, 5, 1), s(GY, 4, 1),
    s(BW, 0, 8), s(GZ, 5, 1), s(BZ, 4, 1), s(RX, 0, 5), s(GZ, 4, 1), s(GY, 0, 4),
    s(GX, 0, 6), s(GZ, 0, 4), s(BX, 0, 5), s(BZ, 1, 1), s(BY, 0, 4), s(RY, 0, 5),
    s(BZ, 2, 1), s(RZ, 0, 5), s(BZ, 3, 1), s(D, 0, 5),
];

/// 8555, 8555, 8666
#[rustfmt::skip]
pub(crate) static MODE_26: &[Segment] = &[
    s(RW, 0, 8), s(BZ, 1, 1), s(BY, 4, 1), s(GW, 0, 8), s(BY, 5, 1), s(GY, 4, 1),
    s(BW, 0, 8), s(BZ, 5, 1), s(BZ, 4, 1), s(RX, 0, 5), s(GZ, 4, 1), s(GY, 0, 4),
    s(GX, 0, 5), s(BZ, 0, 1), s(GZ, 0, 4), s(BX, 0, 6), s(BY, 0, 4), s(RY, 0, 5),
    s(BZ, 2, 1), s(RZ, 0, 5), s(BZ, 3, 1), s(D, 0, 5),
];

/// 6666, 6666, 6666 (explicit endpoints)
#[rustfmt::skip]
pub(crate) static MODE_30: &[Segment] = &[
    s(RW, 0, 6), s(GZ, 4, 1), s(BZ, 0, 1), s(BZ, 1, 1), s(BY, 4, 1), s(GW, 0, 6),
    s(GY, 5, 1), s(BY, 5, 1), s(BZ, 2, 1), s(GY, 4, 1), s(BW, 0, 6), s(GZ, 5, 1),
    s(BZ, 3, 1), s(BZ, 5, 1), s(BZ, 4, 1), s(RX, 0, 6), s(GY, 0, 4), s(GX, 0, 6),
    s(GZ, 0, 4), s(BX, 0, 6), s(BY, 0, 4), s(RY, 0, 6), s(RZ, 0, 6), s(D, 0, 5),
];

/// 10.10, 10.10, 10.10 (explicit endpoints)
#[rustfmt::skip]
pub(crate) static MODE_3: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10), s(RX, 0, 10), s(GX, 0, 10), s(BX, 0, 10),
];

/// 11.9, 11.9, 11.9
#[rustfmt::skip]
pub(crate) static MODE_7: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10), s(RX, 0, 9), s(RW, 10, 1), s(GX, 0, 9),
    s(GW, 10, 1), s(BX, 0, 9), s(BW, 10, 1),
];

/// 12.8, 12.8, 12.8 with w[10:11] stored reversed
#[rustfmt::skip]
pub(crate) static MODE_11: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10),
    s(RX, 0, 8), s(RW, 11, 1), s(RW, 10, 1),
    s(GX, 0, 8), s(GW, 11, 1), s(GW, 10, 1),
    s(BX, 0, 8), s(BW, 11, 1), s(BW, 10, 1),
];

/// 16.4, 16.4, 16.4 with w[10:15] stored reversed
#[rustfmt::skip]
pub(crate) static MODE_15: &[Segment] = &[
    s(RW, 0, 10), s(GW, 0, 10), s(BW, 0, 10),
    s(RX, 0, 4),
    s(RW, 15, 1), s(RW, 14, 1), s(RW, 13, 1), s(RW, 12, 1), s(RW, 11, 1), s(RW, 10, 1),
    s(GX, 0, 4),
    s(GW, 15, 1), s(GW, 14, 1), s(GW, 13, 1), s(GW, 12, 1), s(GW, 11, 1), s(GW, 10, 1),
    s(BX, 0, 4),
    s(BW, 15, 1), s(BW, 14, 1), s(BW, 13, 1), s(BW, 12, 1), s(BW, 11, 1), s(BW, 10, 1),
];
