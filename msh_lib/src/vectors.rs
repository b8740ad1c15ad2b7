use binrw::{
    io::{Read, Seek},
    BinRead, BinResult, Endian,
};

use crate::{FixedSize, MshWrite};

#[cfg(feature = "serde")]
use serde::{
    de::{Error, SeqAccess, Visitor},
    ser::SerializeTuple,
    Deserialize, Serialize, Serializer,
};
#[cfg(feature = "serde")]
use std::{fmt, marker::PhantomData};

/// `N` contiguous floats for encoding UV, XYZ, or XYZW data.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vector<const N: usize>(pub [f32; N]);

/// 2 contiguous floats for encoding UV data.
pub type Vector2 = Vector<2>;
/// 3 contiguous floats for encoding XYZ data.
pub type Vector3 = Vector<3>;
/// 4 contiguous floats for encoding XYZW data such as bone weights.
pub type Vector4 = Vector<4>;

impl<const N: usize> Vector<N> {
    /// The vector with all components set to `0.0`.
    pub const ZERO: Self = Self([0.0; N]);

    pub fn to_array(self) -> [f32; N] {
        self.0
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    fn from(v: [f32; N]) -> Self {
        Self(v)
    }
}

impl<const N: usize> From<Vector<N>> for [f32; N] {
    fn from(v: Vector<N>) -> Self {
        v.0
    }
}

impl<const N: usize> std::ops::Index<usize> for Vector<N> {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Vector2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self([x, y])
    }
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self([x, y, z])
    }
}

impl Vector4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }
}

impl<const N: usize> BinRead for Vector<N> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        <[f32; N]>::read_options(reader, endian, args).map(Self)
    }
}

impl<const N: usize> MshWrite for Vector<N> {
    fn msh_write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.msh_write(writer)
    }
}

impl<const N: usize> FixedSize for Vector<N> {
    const SIZE_IN_BYTES: u64 = 4 * N as u64;
}

#[cfg(feature = "arbitrary")]
impl<'a, const N: usize> arbitrary::Arbitrary<'a> for Vector<N> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self(<[f32; N] as arbitrary::Arbitrary>::arbitrary(u)?))
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> Serialize for Vector<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(N)?;
        for value in &self.0 {
            tuple.serialize_element(value)?;
        }
        tuple.end()
    }
}

#[cfg(feature = "serde")]
struct VectorVisitor<const N: usize>(PhantomData<[f32; N]>);

#[cfg(feature = "serde")]
impl<'de, const N: usize> Visitor<'de> for VectorVisitor<N> {
    type Value = Vector<N>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an array of {} floats", N)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = [0.0f32; N];
        for (i, value) in values.iter_mut().enumerate() {
            *value = seq
                .next_element()?
                .ok_or_else(|| A::Error::invalid_length(i, &self))?;
        }
        Ok(Vector(values))
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> Deserialize<'de> for Vector<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_tuple(N, VectorVisitor::<N>(PhantomData))
    }
}

/// A row-major 4x4 matrix of contiguous floats.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BinRead, Debug, PartialEq, Clone, Copy)]
pub struct Matrix4x4 {
    pub row1: Vector4,
    pub row2: Vector4,
    pub row3: Vector4,
    pub row4: Vector4,
}

impl Matrix4x4 {
    /// The identity transformation matrix.
    ///
    /**
    ```rust
    use msh_lib::{Vector4, Matrix4x4};

    let m = Matrix4x4::identity();
    assert_eq!(Vector4::new(1f32, 0f32, 0f32, 0f32), m.row1);
    assert_eq!(Vector4::new(0f32, 1f32, 0f32, 0f32), m.row2);
    assert_eq!(Vector4::new(0f32, 0f32, 1f32, 0f32), m.row3);
    assert_eq!(Vector4::new(0f32, 0f32, 0f32, 1f32), m.row4);
    ```
    */
    pub fn identity() -> Matrix4x4 {
        Matrix4x4 {
            row1: Vector4::new(1f32, 0f32, 0f32, 0f32),
            row2: Vector4::new(0f32, 1f32, 0f32, 0f32),
            row3: Vector4::new(0f32, 0f32, 1f32, 0f32),
            row4: Vector4::new(0f32, 0f32, 0f32, 1f32),
        }
    }

    /// Converts the elements to a 2d array in row-major order.
    /**
    ```rust
    use msh_lib::{Vector4, Matrix4x4};

    let m = Matrix4x4 {
        row1: Vector4::new(1f32, 2f32, 3f32, 4f32),
        row2: Vector4::new(5f32, 6f32, 7f32, 8f32),
        row3: Vector4::new(9f32, 10f32, 11f32, 12f32),
        row4: Vector4::new(13f32, 14f32, 15f32, 16f32),
    };

    assert_eq!(
        [
            [1f32, 2f32, 3f32, 4f32],
            [5f32, 6f32, 7f32, 8f32],
            [9f32, 10f32, 11f32, 12f32],
            [13f32, 14f32, 15f32, 16f32],
        ],
        m.to_rows_array(),
    );
    ```
    */
    pub fn to_rows_array(&self) -> [[f32; 4]; 4] {
        [
            self.row1.to_array(),
            self.row2.to_array(),
            self.row3.to_array(),
            self.row4.to_array(),
        ]
    }

    /// Creates the matrix from a 2d array in row-major order.
    /**
    ```rust
    # use msh_lib::Matrix4x4;
    let elements = [
        [1f32, 2f32, 3f32, 4f32],
        [5f32, 6f32, 7f32, 8f32],
        [9f32, 10f32, 11f32, 12f32],
        [13f32, 14f32, 15f32, 16f32],
    ];
    let m = Matrix4x4::from_rows_array(&elements);
    assert_eq!(elements, m.to_rows_array());
    ```
    */
    pub fn from_rows_array(rows: &[[f32; 4]; 4]) -> Matrix4x4 {
        Matrix4x4 {
            row1: rows[0].into(),
            row2: rows[1].into(),
            row3: rows[2].into(),
            row4: rows[3].into(),
        }
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl MshWrite for Matrix4x4 {
    fn msh_write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.row1.msh_write(writer)?;
        self.row2.msh_write(writer)?;
        self.row3.msh_write(writer)?;
        self.row4.msh_write(writer)?;
        Ok(())
    }
}

impl FixedSize for Matrix4x4 {
    const SIZE_IN_BYTES: u64 = 4 * Vector4::SIZE_IN_BYTES;
}

/// The axis aligned bounds stored in the file header.
/// Legacy files may have `min` larger than `max`, so the values aren't validated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BinRead, Debug, PartialEq, Clone, Copy, Default)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl MshWrite for BoundingBox {
    fn msh_write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.min.msh_write(writer)?;
        self.max.msh_write(writer)
    }
}

impl FixedSize for BoundingBox {
    const SIZE_IN_BYTES: u64 = 2 * Vector3::SIZE_IN_BYTES;
}
