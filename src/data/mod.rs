/// Data layer: core types, loading, normalization and views.
///
/// Architecture:
/// ```text
///  remote URL / local .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → RawTable (original headers)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  rename, trim, coerce, de-duplicate → VehicleTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  allow-list filters → View (row indices, read-only)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::loader::parse_csv;
    use super::model::{RawTable, VehicleTable};
    use super::normalize::{normalize, NormalizeOptions};

    pub const HEADER: &str = "Brand,Model,AccelSec,TopSpeed_KmH,Range_Km,Efficiency_WhKm,\
FastCharge_KmH,RapidCharge,PowerTrain,PlugType,BodyStyle,Segment,Seats,PriceEuro";

    /// A slice of the public dataset, trailing spaces on brands included.
    /// Row 14 repeats the Tesla Model 3 Long Range with a different price.
    pub const SAMPLE_CSV: &str = "\
Brand,Model,AccelSec,TopSpeed_KmH,Range_Km,Efficiency_WhKm,FastCharge_KmH,RapidCharge,PowerTrain,PlugType,BodyStyle,Segment,Seats,PriceEuro
Tesla ,Model 3 Long Range Dual Motor,4.6,233,450,161,940,Yes,AWD,Type 2 CCS,Sedan,D,5,55480
Volkswagen ,ID.3 Pure,10.0,160,270,167,250,Yes,RWD,Type 2 CCS,Hatchback,C,5,30000
Polestar ,2,4.7,210,400,181,620,Yes,AWD,Type 2 CCS,Liftback,D,5,56440
BMW ,iX3,6.8,180,360,206,560,Yes,RWD,Type 2 CCS,SUV,D,5,68040
Honda ,e,9.5,145,170,168,190,Yes,RWD,Type 2 CCS,Hatchback,B,4,32997
Lucid ,Air,2.8,250,610,180,620,Yes,AWD,Type 2 CCS,Sedan,F,5,105000
Volkswagen ,e-Golf,9.6,150,190,168,220,Yes,FWD,Type 2 CCS,Hatchback,C,5,31900
Peugeot ,e-208,8.1,150,275,164,420,Yes,FWD,Type 2 CCS,Hatchback,B,5,29682
Tesla ,Model 3 Standard Range Plus,5.6,225,310,153,650,Yes,RWD,Type 2 CCS,Sedan,D,5,46380
Audi ,Q4 e-tron,6.3,180,400,193,540,Yes,AWD,Type 2 CCS,SUV,D,5,55000
Kia ,e-Soul 64 kWh,7.9,167,365,175,-,Yes,FWD,Type 2 CCS,SUV,B,5,36837
Renault ,Twingo ZE,12.6,135,130,164,-,No,RWD,Type 2,Hatchback,A,4,24790
Porsche ,Taycan Turbo S,2.8,260,375,223,780,Yes,AWD,Type 2 CCS,Sedan,F,4,180781
Tesla ,Model 3 Long Range Dual Motor,4.6,233,450,161,940,Yes,AWD,Type 2 CCS,Sedan,D,5,59990
Tesla ,Cybertruck Tri Motor,3.0,210,750,267,710,Yes,AWD,Type 2 CCS,Pickup,N,6,75000
Nissan ,Leaf,7.9,144,220,164,230,Yes,FWD,Type 2 CHAdeMO,Hatchback,C,5,29234
Mercedes ,EQC 400 4MATIC,5.1,180,370,216,440,Yes,AWD,Type 2 CCS,SUV,D,5,69484
Hyundai ,Kona Electric 64 kWh,7.9,167,400,160,380,Yes,FWD,Type 2 CCS,SUV,B,5,40795
Smart ,EQ fortwo coupe,11.6,130,100,167,-,No,RWD,Type 2,Hatchback,A,2,21387
Byton ,M-Byte 95 kWh 2WD,7.5,190,325,273,410,Yes,AWD,Type 2 CCS,SUV,E,5,62000
";

    /// One raw CSV line; the columns not named here get plausible constants.
    pub fn row(
        brand: &str,
        model: &str,
        fast_charge: &str,
        body_style: &str,
        efficiency: &str,
        range: &str,
        price: &str,
    ) -> String {
        format!(
            "{brand},{model},5.0,200,{range},{efficiency},{fast_charge},Yes,AWD,Type 2 CCS,{body_style},D,5,{price}"
        )
    }

    pub fn raw(csv: &str) -> RawTable {
        parse_csv(csv.as_bytes(), "fixture").unwrap()
    }

    pub fn sample_table() -> VehicleTable {
        normalize(&raw(SAMPLE_CSV), &NormalizeOptions::default()).unwrap()
    }
}
