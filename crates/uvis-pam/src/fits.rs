//! FITS access for science images and pixel area maps.
//!
//! Decoding is done by `fitsio-pure`; this module picks out the HDUs the
//! correction needs and writes corrected copies back out.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fitsio_pure::block::padded_byte_len;
use fitsio_pure::extension::{build_extension_header, ExtensionType};
use fitsio_pure::hdu::{parse_fits, FitsData, Hdu, HduInfo};
use fitsio_pure::header::{serialize_header, Card};
use fitsio_pure::image::{image_dimensions, read_image_physical, serialize_image, ImageData};
use fitsio_pure::value::Value;
use log::{debug, info};
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::geometry::SubarrayGeometry;
use crate::header::{keyword, ScienceHeader, EXTNAME};
use crate::pam::{pam_file_name, PixelAreaMap};

/// Keyword recording that the correction was applied.
pub const PAMCORR: &str = "PAMCORR";

/// Scaling keywords that no longer apply once pixels are stored as floats.
const SCALING_KEYWORDS: [&str; 3] = ["BSCALE", "BZERO", "BLANK"];

/// Keywords describing a tile-compressed image's table storage rather than
/// the image. Each root also matches with a numeric suffix (`ZNAXIS1`).
const TILE_STORAGE_KEYWORDS: [&str; 35] = [
    "XTENSION", "BITPIX", "NAXIS", "PCOUNT", "GCOUNT", "TFIELDS", "THEAP", "TTYPE", "TFORM",
    "TUNIT", "TDIM", "TSCAL", "TZERO", "TNULL", "TDISP", "ZIMAGE", "ZCMPTYPE", "ZBITPIX",
    "ZNAXIS", "ZTILE", "ZNAME", "ZVAL", "ZQUANTIZ", "ZDITHER", "ZSIMPLE", "ZTENSION", "ZEXTEND",
    "ZBLOCKED", "ZPCOUNT", "ZGCOUNT", "ZHECKSUM", "ZDATASUM", "ZSCALE", "ZZERO", "ZBLANK",
];

/// A FITS file held in memory together with its parsed HDU layout.
#[derive(Debug, Clone)]
pub struct FitsFile {
    path: PathBuf,
    bytes: Vec<u8>,
    layout: FitsData,
}

/// One 2-D image HDU with its header.
#[derive(Debug, Clone)]
pub struct ScienceExtension {
    /// Zero-based HDU index in the file.
    pub index: usize,
    /// BITPIX of the stored pixels.
    pub bitpix: i64,
    pub header: ScienceHeader,
    /// Physical pixel values, `NAXIS2` rows by `NAXIS1` columns.
    pub data: Array2<f64>,
}

/// Corrected pixels destined for HDU `index` of the source file.
#[derive(Debug, Clone)]
pub struct CorrectedExtension {
    pub index: usize,
    pub chip: i64,
    /// BITPIX of the source HDU; the output is written as -64 when this is
    /// -64 and as -32 otherwise.
    pub bitpix: i64,
    /// Region of the map that was applied.
    pub geometry: SubarrayGeometry,
    pub data: Array2<f64>,
}

/// Reads and parses the file at `path`.
pub fn read_fits(path: impl AsRef<Path>) -> Result<FitsFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    FitsFile::from_bytes(path, bytes)
}

/// Loads the 2-D image in HDU `index` of `path`.
pub fn load_science(path: impl AsRef<Path>, index: usize) -> Result<ScienceExtension> {
    read_fits(path)?.image(index)
}

/// Loads a pixel area map from the primary HDU, or from the first image
/// extension when the primary HDU is empty.
pub fn load_pam(path: impl AsRef<Path>) -> Result<PixelAreaMap> {
    let file = read_fits(path)?;
    let index = file
        .first_image_index()
        .ok_or_else(|| Error::NoScienceData(file.path.clone()))?;
    Ok(PixelAreaMap::new(file.image(index)?.data))
}

impl FitsFile {
    /// Parses an in-memory FITS byte stream. `path` is kept for messages.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Result<Self> {
        let layout = parse_fits(&bytes)?;
        Ok(Self {
            path: path.into(),
            bytes,
            layout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of HDUs.
    pub fn len(&self) -> usize {
        self.layout.hdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.hdus.is_empty()
    }

    fn hdu(&self, index: usize) -> Result<&Hdu> {
        self.layout
            .hdus
            .get(index)
            .ok_or(Error::NotAnImage { hdu: index })
    }

    /// Header of HDU `index`.
    ///
    /// For a tile-compressed image the axes and BITPIX are those of the image,
    /// not of the table that stores it.
    pub fn header(&self, index: usize) -> Result<ScienceHeader> {
        Ok(image_header(self.hdu(index)?))
    }

    /// Reads HDU `index` as a 2-D image of physical values.
    pub fn image(&self, index: usize) -> Result<ScienceExtension> {
        let hdu = self.hdu(index)?;
        let (rows, cols) = image_shape(hdu, index)?;
        let bitpix = match &hdu.info {
            HduInfo::Primary { bitpix, .. } | HduInfo::Image { bitpix, .. } => *bitpix,
            HduInfo::CompressedImage { zbitpix, .. } => *zbitpix,
            _ => return Err(Error::NotAnImage { hdu: index }),
        };
        let pixels = read_image_physical(&self.bytes, hdu)?;
        let data = Array2::from_shape_vec((rows, cols), pixels)?;
        debug!(
            "{}: read HDU {index} ({rows}x{cols}, BITPIX {bitpix})",
            self.path.display()
        );
        Ok(ScienceExtension {
            index,
            bitpix,
            header: image_header(hdu),
            data,
        })
    }

    /// Indices of the HDUs named `SCI`, or of the first 2-D image HDU when
    /// no HDU carries that name.
    pub fn science_indices(&self) -> Vec<usize> {
        let named: Vec<usize> = self
            .layout
            .hdus
            .iter()
            .enumerate()
            .filter(|(_, hdu)| is_science(hdu))
            .map(|(i, _)| i)
            .collect();
        if !named.is_empty() {
            return named;
        }
        self.first_image_index().into_iter().collect()
    }

    /// Every science image in the file.
    pub fn science_extensions(&self) -> Result<Vec<ScienceExtension>> {
        let indices = self.science_indices();
        if indices.is_empty() {
            return Err(Error::NoScienceData(self.path.clone()));
        }
        indices.into_iter().map(|i| self.image(i)).collect()
    }

    fn first_image_index(&self) -> Option<usize> {
        self.layout
            .hdus
            .iter()
            .enumerate()
            .find(|(i, hdu)| image_shape(hdu, *i).is_ok())
            .map(|(i, _)| i)
    }
}

fn is_science(hdu: &Hdu) -> bool {
    hdu.cards.iter().any(|c| {
        c.keyword_str() == EXTNAME
            && matches!(&c.value, Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("SCI"))
    })
}

fn image_shape(hdu: &Hdu, index: usize) -> Result<(usize, usize)> {
    let naxes = image_dimensions(hdu).map_err(|_| Error::NotAnImage { hdu: index })?;
    match naxes.as_slice() {
        [naxis1, naxis2] if *naxis1 > 0 && *naxis2 > 0 => Ok((*naxis2, *naxis1)),
        _ => Err(Error::NotAnImage { hdu: index }),
    }
}

fn image_header(hdu: &Hdu) -> ScienceHeader {
    match &hdu.info {
        HduInfo::CompressedImage { zbitpix, znaxes, .. } => {
            decompressed_header(&hdu.cards, *zbitpix, znaxes)
        }
        _ => ScienceHeader::from_cards(&hdu.cards),
    }
}

fn decompressed_header(cards: &[Card], zbitpix: i64, znaxes: &[usize]) -> ScienceHeader {
    let mut header = ScienceHeader::from_cards(cards);
    header.insert("BITPIX", zbitpix);
    header.insert("NAXIS", znaxes.len());
    for (i, n) in znaxes.iter().enumerate() {
        header.insert(&format!("NAXIS{}", i + 1), *n);
    }
    header
}

fn is_tile_storage_keyword(kw: &str) -> bool {
    TILE_STORAGE_KEYWORDS.iter().any(|root| {
        kw.strip_prefix(root)
            .is_some_and(|rest| rest.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Cards of a plain image extension holding what a tile-compressed HDU
/// stored: fresh structural keywords followed by the source's own keywords.
fn decompressed_cards(
    source: &[Card],
    out_bitpix: i64,
    rows: usize,
    cols: usize,
) -> Result<Vec<Card>> {
    let mut cards = build_extension_header(ExtensionType::Image, out_bitpix, &[cols, rows], 0, 1)?;
    cards.extend(
        source
            .iter()
            .filter(|c| !c.is_end() && !is_tile_storage_keyword(c.keyword_str()))
            .cloned(),
    );
    Ok(cards)
}

/// Header cards for a corrected HDU: the source cards with BITPIX switched to
/// the float type, scaling keywords dropped and the correction recorded.
fn corrected_cards(source: &[Card], ext: &CorrectedExtension, out_bitpix: i64) -> Vec<Card> {
    let mut cards: Vec<Card> = source
        .iter()
        .filter(|c| !c.is_end())
        .filter(|c| {
            let kw = c.keyword_str();
            kw != PAMCORR && !SCALING_KEYWORDS.contains(&kw)
        })
        .cloned()
        .collect();
    for card in &mut cards {
        if card.keyword_str() == "BITPIX" {
            card.value = Some(Value::Integer(out_bitpix));
        }
    }
    cards.push(Card {
        keyword: keyword(PAMCORR),
        value: Some(Value::String("COMPLETE".to_string())),
        comment: Some("pixel area map correction".to_string()),
    });
    cards.push(Card {
        keyword: keyword("HISTORY"),
        value: None,
        comment: Some(format!(
            "Multiplied by {}{}",
            pam_file_name(ext.chip),
            ext.geometry
        )),
    });
    cards
}

fn encode_corrected(hdu: &Hdu, ext: &CorrectedExtension) -> Result<Vec<u8>> {
    let (rows, cols) = image_shape(hdu, ext.index)?;
    if ext.data.dim() != (rows, cols) {
        let (data_rows, data_cols) = ext.data.dim();
        return Err(Error::ShapeMismatch {
            naxis1: cols,
            naxis2: rows,
            rows: data_rows,
            cols: data_cols,
        });
    }

    let (out_bitpix, pixels) = if ext.bitpix == -64 {
        (-64, ImageData::F64(ext.data.iter().copied().collect()))
    } else {
        (-32, ImageData::F32(ext.data.iter().map(|&v| v as f32).collect()))
    };
    let cards = match &hdu.info {
        HduInfo::Primary { .. } | HduInfo::Image { .. } => {
            corrected_cards(&hdu.cards, ext, out_bitpix)
        }
        HduInfo::CompressedImage { .. } => {
            let plain = decompressed_cards(&hdu.cards, out_bitpix, rows, cols)?;
            corrected_cards(&plain, ext, out_bitpix)
        }
        _ => return Err(Error::NotAnImage { hdu: ext.index }),
    };
    let header_bytes = serialize_header(&cards);
    let data_bytes = serialize_image(&pixels);

    let mut out = Vec::with_capacity(header_bytes.len() + data_bytes.len());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&data_bytes);
    Ok(out)
}

/// The bytes of `hdu` as stored, with missing trailing padding restored.
fn raw_hdu(bytes: &[u8], hdu: &Hdu) -> Vec<u8> {
    let end = hdu.data_start + padded_byte_len(hdu.data_len);
    let available = end.min(bytes.len());
    let mut out = bytes[hdu.header_start..available].to_vec();
    out.resize(end - hdu.header_start, 0);
    out
}

/// Serializes `source` with the HDUs listed in `corrected` replaced.
///
/// HDUs without a corrected counterpart are copied byte for byte.
pub fn corrected_bytes(source: &FitsFile, corrected: &[CorrectedExtension]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(source.bytes.len());
    for (index, hdu) in source.layout.hdus.iter().enumerate() {
        match corrected.iter().find(|ext| ext.index == index) {
            Some(ext) => out.extend(encode_corrected(hdu, ext)?),
            None => out.extend(raw_hdu(&source.bytes, hdu)),
        }
    }
    Ok(out)
}

/// Writes a corrected copy of `source` to `path`.
///
/// Unless `overwrite` is set the file must not exist yet; the check and the
/// creation are one step, so concurrent writers cannot replace each other.
pub fn write_corrected(
    path: impl AsRef<Path>,
    source: &FitsFile,
    corrected: &[CorrectedExtension],
    overwrite: bool,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = corrected_bytes(source, corrected)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create(overwrite)
        .truncate(overwrite)
        .create_new(!overwrite)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::OutputExists(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
    file.write_all(&bytes)?;
    info!(
        "wrote {} corrected HDU(s) of {} to {}",
        corrected.len(),
        source.path.display(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsio_pure::primary::build_primary_header;
    use ndarray::array;

    fn card(name: &str, value: Value) -> Card {
        Card {
            keyword: keyword(name),
            value: Some(value),
            comment: None,
        }
    }

    fn geometry(rows: usize, cols: usize) -> SubarrayGeometry {
        SubarrayGeometry {
            x0: 0,
            y0: 0,
            x1: cols,
            y1: rows,
        }
    }

    fn empty_primary() -> Vec<u8> {
        let cards = build_primary_header(8, &[]).unwrap();
        serialize_header(&cards)
    }

    fn image_extension(
        extname: &str,
        chip: i64,
        rows: usize,
        cols: usize,
        pixels: Vec<f32>,
    ) -> Vec<u8> {
        let mut cards =
            build_extension_header(ExtensionType::Image, -32, &[cols, rows], 0, 1).unwrap();
        cards.push(card("EXTNAME", Value::String(extname.to_string())));
        cards.push(card("CCDCHIP", Value::Integer(chip)));
        cards.push(card("LTV1", Value::Float(0.0)));
        cards.push(card("LTV2", Value::Float(0.0)));
        let mut out = serialize_header(&cards);
        out.extend(serialize_image(&ImageData::F32(pixels)));
        out
    }

    fn two_chip_file() -> FitsFile {
        let mut bytes = empty_primary();
        bytes.extend(image_extension("SCI", 2, 2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        bytes.extend(image_extension("ERR", 2, 2, 3, vec![0.5; 6]));
        bytes.extend(image_extension("SCI", 1, 2, 3, vec![7.0; 6]));
        FitsFile::from_bytes("two_chip_flt.fits", bytes).unwrap()
    }

    #[test]
    fn finds_sci_extensions() {
        let file = two_chip_file();
        assert_eq!(file.len(), 4);
        assert_eq!(file.science_indices(), vec![1, 3]);
    }

    #[test]
    fn reads_image_rows_by_naxis2() {
        let file = two_chip_file();
        let ext = file.image(1).unwrap();
        assert_eq!(ext.bitpix, -32);
        assert_eq!(ext.data, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(ext.header.ccdchip().unwrap(), 2);
        assert_eq!(ext.header.text(EXTNAME), Some("SCI"));
    }

    #[test]
    fn empty_primary_is_not_an_image() {
        let file = two_chip_file();
        assert!(matches!(file.image(0), Err(Error::NotAnImage { hdu: 0 })));
        assert!(matches!(file.image(9), Err(Error::NotAnImage { hdu: 9 })));
    }

    #[test]
    fn unnamed_image_falls_back_to_first_image() {
        let mut bytes = empty_primary();
        bytes.extend(image_extension("", 1, 2, 2, vec![1.0; 4]));
        let file = FitsFile::from_bytes("pam.fits", bytes).unwrap();
        assert_eq!(file.science_indices(), vec![1]);
    }

    #[test]
    fn no_image_at_all() {
        let file = FitsFile::from_bytes("empty.fits", empty_primary()).unwrap();
        assert!(file.science_indices().is_empty());
        assert!(matches!(
            file.science_extensions(),
            Err(Error::NoScienceData(_))
        ));
    }

    #[test]
    fn corrected_copy_replaces_only_listed_hdus() {
        let file = two_chip_file();
        let corrected = CorrectedExtension {
            index: 1,
            chip: 2,
            bitpix: -32,
            geometry: geometry(2, 3),
            data: array![[2.0, 4.0, 6.0], [8.0, 10.0, 12.0]],
        };
        let bytes = corrected_bytes(&file, &[corrected]).unwrap();
        let out = FitsFile::from_bytes("out.fits", bytes).unwrap();

        assert_eq!(out.len(), 4);
        let sci = out.image(1).unwrap();
        assert_eq!(sci.data, array![[2.0, 4.0, 6.0], [8.0, 10.0, 12.0]]);
        assert_eq!(sci.header.text(PAMCORR), Some("COMPLETE"));
        assert_eq!(sci.header.ccdchip().unwrap(), 2);

        assert!(!out.header(2).unwrap().contains(PAMCORR));
        assert!(out.image(2).unwrap().data.iter().all(|&v| v == 0.5));
        assert!(!out.header(3).unwrap().contains(PAMCORR));
        assert!(out.image(3).unwrap().data.iter().all(|&v| v == 7.0));
    }

    #[test]
    fn corrected_copy_keeps_double_precision() {
        let file = two_chip_file();
        let corrected = CorrectedExtension {
            index: 3,
            chip: 1,
            bitpix: -64,
            geometry: geometry(2, 3),
            data: Array2::from_elem((2, 3), 0.1),
        };
        let bytes = corrected_bytes(&file, &[corrected]).unwrap();
        let out = FitsFile::from_bytes("out.fits", bytes).unwrap();
        let sci = out.image(3).unwrap();
        assert_eq!(sci.bitpix, -64);
        assert!(sci.data.iter().all(|&v| v == 0.1));
    }

    #[test]
    fn corrected_shape_must_match_hdu() {
        let file = two_chip_file();
        let corrected = CorrectedExtension {
            index: 1,
            chip: 2,
            bitpix: -32,
            geometry: geometry(3, 2),
            data: Array2::zeros((3, 2)),
        };
        assert!(matches!(
            corrected_bytes(&file, &[corrected]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    /// A tile-compressed 2x3 SCI image as the parser describes it. Only the
    /// header is needed to rewrite it, so no table data is attached.
    fn compressed_sci_hdu() -> Hdu {
        let cards = vec![
            card("XTENSION", Value::String("BINTABLE".to_string())),
            card("BITPIX", Value::Integer(8)),
            card("NAXIS", Value::Integer(2)),
            card("NAXIS1", Value::Integer(8)),
            card("NAXIS2", Value::Integer(2)),
            card("PCOUNT", Value::Integer(96)),
            card("GCOUNT", Value::Integer(1)),
            card("TFIELDS", Value::Integer(1)),
            card("TTYPE1", Value::String("COMPRESSED_DATA".to_string())),
            card("TFORM1", Value::String("1PB(48)".to_string())),
            card("ZIMAGE", Value::Logical(true)),
            card("ZBITPIX", Value::Integer(-32)),
            card("ZNAXIS", Value::Integer(2)),
            card("ZNAXIS1", Value::Integer(3)),
            card("ZNAXIS2", Value::Integer(2)),
            card("ZTILE1", Value::Integer(3)),
            card("ZTILE2", Value::Integer(1)),
            card("ZCMPTYPE", Value::String("RICE_1".to_string())),
            card("ZNAME1", Value::String("BLOCKSIZE".to_string())),
            card("ZVAL1", Value::Integer(32)),
            card("EXTNAME", Value::String("SCI".to_string())),
            card("CCDCHIP", Value::Integer(2)),
            card("LTV1", Value::Float(-4.0)),
            card("LTV2", Value::Float(-1.0)),
        ];
        Hdu {
            info: HduInfo::CompressedImage {
                zbitpix: -32,
                znaxes: vec![3, 2],
                zcmptype: "RICE_1".to_string(),
                ztile: vec![3, 1],
                blocksize: 32,
                rice_bytepix: 4,
                naxis1: 8,
                naxis2: 2,
                pcount: 96,
                tfields: 1,
            },
            header_start: 0,
            data_start: 0,
            data_len: 0,
            cards,
        }
    }

    #[test]
    fn compressed_header_describes_image() {
        let header = image_header(&compressed_sci_hdu());
        assert_eq!(header.axis_len("NAXIS1").unwrap(), 3);
        assert_eq!(header.axis_len("NAXIS2").unwrap(), 2);
        assert_eq!(header.integer("BITPIX").unwrap(), -32);
        assert_eq!(header.ccdchip().unwrap(), 2);

        let g = SubarrayGeometry::from_header(&header, crate::LtvPolicy::Absolute).unwrap();
        assert!(g.check_shape(2, 3).is_ok());
    }

    #[test]
    fn compressed_hdu_written_as_plain_image() {
        let hdu = compressed_sci_hdu();
        let corrected = CorrectedExtension {
            index: 1,
            chip: 2,
            bitpix: -32,
            geometry: SubarrayGeometry {
                x0: 4,
                y0: 1,
                x1: 7,
                y1: 3,
            },
            data: array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        };
        let mut bytes = empty_primary();
        bytes.extend(encode_corrected(&hdu, &corrected).unwrap());
        let out = FitsFile::from_bytes("out.fits", bytes).unwrap();

        let sci = out.image(1).unwrap();
        assert_eq!(sci.data, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(sci.header.text("XTENSION"), Some("IMAGE"));
        assert_eq!(sci.header.text(EXTNAME), Some("SCI"));
        assert_eq!(sci.header.text(PAMCORR), Some("COMPLETE"));
        assert_eq!(sci.header.real("LTV1").unwrap(), -4.0);
        for gone in ["ZIMAGE", "ZCMPTYPE", "ZNAXIS1", "ZVAL1", "TTYPE1", "TFORM1", "TFIELDS"] {
            assert!(!sci.header.contains(gone), "{gone} kept");
        }
    }

    #[test]
    fn tile_storage_keywords() {
        assert!(is_tile_storage_keyword("ZNAXIS2"));
        assert!(is_tile_storage_keyword("TFORM12"));
        assert!(is_tile_storage_keyword("NAXIS"));
        assert!(!is_tile_storage_keyword("EXTNAME"));
        assert!(!is_tile_storage_keyword("LTV1"));
        assert!(!is_tile_storage_keyword("NAXISX"));
    }

    #[test]
    fn existing_output_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fits");
        std::fs::write(&path, b"keep").unwrap();
        let file = two_chip_file();

        let result = write_corrected(&path, &file, &[], false);
        assert!(matches!(result, Err(Error::OutputExists(p)) if p == path));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep");

        write_corrected(&path, &file, &[], true).unwrap();
        let out = read_fits(&path).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn scaling_keywords_dropped() {
        let source = vec![
            card("XTENSION", Value::String("IMAGE".to_string())),
            card("BITPIX", Value::Integer(16)),
            card("BSCALE", Value::Float(2.0)),
            card("BZERO", Value::Float(32768.0)),
            card("EXTNAME", Value::String("SCI".to_string())),
        ];
        let ext = CorrectedExtension {
            index: 1,
            chip: 1,
            bitpix: 16,
            geometry: geometry(1, 1),
            data: Array2::zeros((1, 1)),
        };
        let cards = corrected_cards(&source, &ext, -32);
        let header = ScienceHeader::from_cards(&cards);
        assert_eq!(header.integer("BITPIX").unwrap(), -32);
        assert!(!header.contains("BSCALE"));
        assert!(!header.contains("BZERO"));
        let history = cards.last().unwrap();
        assert_eq!(history.keyword_str(), "HISTORY");
        assert_eq!(
            history.comment.as_deref(),
            Some("Multiplied by UVIS1wfc3_map.fits[0:1, 0:1]")
        );
    }
}
